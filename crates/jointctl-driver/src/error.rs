//! 调度层错误类型定义

use jointctl_transport::{TransportError, TransportKind};
use thiserror::Error;

/// 调度错误
///
/// 消息只包含失败阶段（setup / send）和传输类型，具体原因见 `source()`。
#[derive(Error, Debug)]
pub enum DispatchError {
    /// 传输初始化失败（如 HTTP 客户端创建失败）
    #[error("{kind} transport setup failed")]
    Connect {
        kind: TransportKind,
        #[source]
        source: TransportError,
    },

    /// 下发失败
    #[error("{kind} send failed")]
    Send {
        kind: TransportKind,
        #[source]
        source: TransportError,
    },
}

impl DispatchError {
    pub fn kind(&self) -> TransportKind {
        match self {
            DispatchError::Connect { kind, .. } | DispatchError::Send { kind, .. } => *kind,
        }
    }

    /// 底层传输错误
    pub fn transport_error(&self) -> &TransportError {
        match self {
            DispatchError::Connect { source, .. } | DispatchError::Send { source, .. } => source,
        }
    }
}
