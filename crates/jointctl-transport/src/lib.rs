//! # jointctl 传输层
//!
//! 把 [`CommandScript`] 下发到运动控制器的统一抽象，提供两种实现：
//! - [`SerialTransport`]：逐行写串口，可选读取每行的应答
//! - [`HttpTransport`]：整段脚本一次 POST 到 Moonraker `/printer/gcode/script`
//!
//! 每次 `send` 独占连接：串口在调用内打开并在返回前关闭，HTTP 每次一个请求，不重试。

mod config;
mod error;
mod http;
mod serial;

pub use config::{HttpConfig, LineEnding, SerialConfig, TransportConfig, TransportKind};
pub use error::TransportError;
pub use http::HttpTransport;
pub use serial::SerialTransport;

use jointctl_gcode::CommandScript;

/// 一次成功下发的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// 已下发的行数
    pub lines_sent: usize,

    /// 控制器应答
    ///
    /// 串口：按行读取到的非空应答；HTTP：非空响应体（一条）。
    pub responses: Vec<String>,
}

/// 脚本下发能力
pub trait Transport {
    /// 传输类型
    fn kind(&self) -> TransportKind;

    /// 按顺序下发整段脚本
    fn send(&mut self, script: &CommandScript) -> Result<Delivery, TransportError>;
}
