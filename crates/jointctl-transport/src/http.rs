//! Moonraker HTTP 传输
//!
//! 整段脚本以 `\n` 连接后一次 POST 到 `/printer/gcode/script`，
//! 行的执行顺序由远端解释器按载荷中的顺序保证。只有 HTTP 200 视为成功。

use crate::config::{HttpConfig, TransportKind};
use crate::error::TransportError;
use crate::{Delivery, Transport};
use jointctl_gcode::CommandScript;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Serialize)]
struct ScriptPayload<'a> {
    script: &'a str,
}

/// Moonraker HTTP 传输
pub struct HttpTransport {
    config: HttpConfig,
    client: Client,
}

impl HttpTransport {
    /// 创建阻塞 HTTP 客户端（带请求超时）
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { config, client })
    }
}

impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    fn send(&mut self, script: &CommandScript) -> Result<Delivery, TransportError> {
        let url = self.config.script_url();
        let joined = script.joined();
        info!(%url, lines = script.len(), "posting gcode script");
        debug!("payload script:\n{joined}");

        let mut request = self.client.post(&url).json(&ScriptPayload { script: &joined });
        if let Some(key) = self.config.api_key() {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().map_err(|source| TransportError::Unreachable {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|source| TransportError::Unreachable { url, source })?;
        debug!(status = status.as_u16(), "controller response: {body}");

        if status != StatusCode::OK {
            return Err(TransportError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Delivery {
            lines_sent: script.len(),
            responses: if body.is_empty() { Vec::new() } else { vec![body] },
        })
    }
}
