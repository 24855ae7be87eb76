//! # jointctl 调度层
//!
//! 解析 → 构建 → （dry-run 返回脚本 | 传输下发），两种传输语义一致。
//!
//! dry-run 与真实下发共用同一个 [`jointctl_gcode::build`]，dry-run 不会创建任何传输
//! （不打开串口，也不创建 HTTP 客户端）。

mod dispatcher;
mod error;

pub use dispatcher::{Connector, Dispatcher, Outcome, dispatch};
pub use error::DispatchError;
