//! 串口传输
//!
//! 每次 `send`：打开串口 → 清空收发缓冲 → 逐行写出并 flush → 等待 → 可选读取一行应答。
//! 串口句柄在 `send` 返回时随作用域释放（成功、写失败、中断都一样）。

use crate::config::{SerialConfig, TransportKind};
use crate::error::TransportError;
use crate::{Delivery, Transport};
use jointctl_gcode::CommandScript;
use serialport::ClearBuffer;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 串口传输
pub struct SerialTransport {
    config: SerialConfig,
    interrupt: Arc<AtomicBool>,
}

impl SerialTransport {
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 使用外部中断标志（如 Ctrl+C 处理器设置）
    ///
    /// 标志在行与行之间检查，置位后中止下发并关闭串口。
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }
}

impl Transport for SerialTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn send(&mut self, script: &CommandScript) -> Result<Delivery, TransportError> {
        let total = script.len();

        let mut port = serialport::new(&self.config.port, self.config.baud)
            .timeout(self.config.timeout)
            .open()
            .map_err(|source| TransportError::Unavailable {
                port: self.config.port.clone(),
                source,
            })?;
        info!(port = %self.config.port, baud = self.config.baud, "serial port opened");

        port.clear(ClearBuffer::All).map_err(|e| TransportError::Io {
            sent: 0,
            total,
            source: e.into(),
        })?;

        let result = stream_lines(port.as_mut(), script.lines(), &self.config, &self.interrupt);
        drop(port);
        debug!(port = %self.config.port, "serial port closed");

        result
    }
}

/// 逐行写出脚本
///
/// 返回的 `Delivery::responses` 只包含非空应答。
pub(crate) fn stream_lines<P: Read + Write + ?Sized>(
    port: &mut P,
    lines: &[String],
    config: &SerialConfig,
    interrupt: &AtomicBool,
) -> Result<Delivery, TransportError> {
    let total = lines.len();
    let mut responses = Vec::new();

    for (sent, line) in lines.iter().enumerate() {
        let fail = |source: io::Error| {
            warn!(sent, total, error = %source, "serial send aborted");
            TransportError::Io {
                sent,
                total,
                source,
            }
        };

        if interrupt.load(Ordering::SeqCst) {
            return Err(fail(io::Error::new(io::ErrorKind::Interrupted, "interrupted")));
        }

        if !line.is_ascii() {
            return Err(fail(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("line is not ASCII: {line:?}"),
            )));
        }

        debug!(">> {line}");
        let payload = format!("{line}{}", config.line_ending.as_str());
        port.write_all(payload.as_bytes()).map_err(fail)?;
        port.flush().map_err(fail)?;

        if !config.wait.is_zero() {
            thread::sleep(config.wait);
        }

        if config.read_responses {
            match read_response_line(port, config.timeout) {
                Ok(Some(response)) => {
                    debug!("<< {response}");
                    responses.push(response);
                },
                Ok(None) => {},
                Err(e) => return Err(fail(e)),
            }
        }
    }

    Ok(Delivery {
        lines_sent: total,
        responses,
    })
}

/// 单行应答的最大长度（字节），超出部分丢弃
const MAX_RESPONSE_LEN: usize = 1024;

/// 读取一行应答，超时或无数据时返回 `None`
///
/// `timeout` 限制整行的读取时间，而不只是单次 `read`；
/// 持续有数据但没有换行时，到期后返回已读到的部分。
fn read_response_line<P: Read + ?Sized>(port: &mut P, timeout: Duration) -> io::Result<Option<String>> {
    let deadline = Instant::now() + timeout;
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];

    while Instant::now() < deadline {
        match port.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) if buf.len() < MAX_RESPONSE_LEN => buf.push(byte[0]),
            Ok(_) => {},
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    let text = String::from_utf8_lossy(&buf).trim().to_string();
    Ok((!text.is_empty()).then_some(text))
}
