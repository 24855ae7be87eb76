//! 运行模式
//!
//! 支持两种模式：
//! - One-shot 模式：每次命令独立构建、下发
//! - 交互模式：菜单循环，逐个关节提示输入

pub mod interactive;
pub mod oneshot;
