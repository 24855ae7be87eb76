//! 调度器
//!
//! 单线程、同步阻塞：一个请求构建并下发完成后才处理下一个。

use crate::error::DispatchError;
use jointctl_gcode::{CommandScript, MoveRequest, build};
use jointctl_transport::{
    Delivery, HttpTransport, SerialTransport, Transport, TransportConfig, TransportError,
    TransportKind,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

/// 按需创建传输
///
/// 只在真实下发时调用，dry-run 路径不会触达。
pub trait Connector {
    fn kind(&self) -> TransportKind;

    fn connect(&self, interrupt: &Arc<AtomicBool>) -> Result<Box<dyn Transport>, TransportError>;
}

impl Connector for TransportConfig {
    fn kind(&self) -> TransportKind {
        TransportConfig::kind(self)
    }

    fn connect(&self, interrupt: &Arc<AtomicBool>) -> Result<Box<dyn Transport>, TransportError> {
        match self {
            TransportConfig::Serial(config) => Ok(Box::new(
                SerialTransport::new(config.clone()).with_interrupt(Arc::clone(interrupt)),
            )),
            TransportConfig::Http(config) => Ok(Box::new(HttpTransport::new(config.clone())?)),
        }
    }
}

/// 调度结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// dry-run：只构建，不下发
    DryRun { script: CommandScript },

    /// 已下发
    Sent {
        kind: TransportKind,
        script: CommandScript,
        delivery: Delivery,
    },
}

impl Outcome {
    pub fn script(&self) -> &CommandScript {
        match self {
            Outcome::DryRun { script } | Outcome::Sent { script, .. } => script,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Outcome::DryRun { .. })
    }
}

/// 调度器
pub struct Dispatcher<C = TransportConfig> {
    connector: C,
    interrupt: Arc<AtomicBool>,
}

impl<C: Connector> Dispatcher<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 共享中断标志（串口在行间检查）
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn kind(&self) -> TransportKind {
        self.connector.kind()
    }

    /// 构建脚本并按需下发
    ///
    /// # 错误
    /// dry-run 永远不会返回错误；真实下发时返回 [`DispatchError`]
    pub fn dispatch(&self, request: &MoveRequest, dry_run: bool) -> Result<Outcome, DispatchError> {
        let script = build(request);
        debug!(lines = script.len(), dry_run, "script built");

        if dry_run {
            return Ok(Outcome::DryRun { script });
        }

        let kind = self.connector.kind();
        let mut transport = self
            .connector
            .connect(&self.interrupt)
            .map_err(|source| DispatchError::Connect { kind, source })?;

        match transport.send(&script) {
            Ok(delivery) => {
                info!(%kind, lines = delivery.lines_sent, "script delivered");
                Ok(Outcome::Sent {
                    kind,
                    script,
                    delivery,
                })
            },
            Err(source) => {
                warn!(%kind, error = %source, "script delivery failed");
                Err(DispatchError::Send { kind, source })
            },
        }
    }
}

/// 使用传输配置执行一次调度
pub fn dispatch(
    request: &MoveRequest,
    config: &TransportConfig,
    dry_run: bool,
) -> Result<Outcome, DispatchError> {
    Dispatcher::new(config.clone()).dispatch(request, dry_run)
}
