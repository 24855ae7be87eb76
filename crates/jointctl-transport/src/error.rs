//! 传输层错误类型定义

use thiserror::Error;

/// 传输层错误
///
/// 所有错误对单次下发都是终止性的，传输层内部不做恢复或重试。
#[derive(Error, Debug)]
pub enum TransportError {
    /// 串口无法打开
    #[error("serial port {port} unavailable")]
    Unavailable {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// 串口传输中途失败（可能已部分下发）
    #[error("serial I/O failed, {sent} of {total} lines sent")]
    Io {
        sent: usize,
        total: usize,
        #[source]
        source: std::io::Error,
    },

    /// 无法连接控制器或请求超时
    #[error("controller at {url} unreachable")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 控制器返回非成功状态码
    #[error("controller rejected script: HTTP {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    /// HTTP 客户端初始化失败
    #[error("HTTP client setup failed")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// 串口部分下发时已写出的行数
    pub fn lines_sent(&self) -> Option<(usize, usize)> {
        match self {
            TransportError::Io { sent, total, .. } => Some((*sent, *total)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Io {
            sent: 1,
            total: 3,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"),
        };
        assert_eq!(err.to_string(), "serial I/O failed, 1 of 3 lines sent");
        assert_eq!(err.source().unwrap().to_string(), "device unplugged");
        assert_eq!(err.lines_sent(), Some((1, 3)));

        let err = TransportError::RemoteRejected {
            status: 400,
            body: "bad macro".to_string(),
        };
        assert_eq!(err.to_string(), "controller rejected script: HTTP 400: bad macro");
        assert_eq!(err.lines_sent(), None);
    }

    #[test]
    fn test_unavailable_display() {
        let err = TransportError::Unavailable {
            port: "/dev/ttyUSB9".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "no such device"),
        };
        assert_eq!(err.to_string(), "serial port /dev/ttyUSB9 unavailable");
        assert_eq!(err.source().unwrap().to_string(), "no such device");
    }
}
