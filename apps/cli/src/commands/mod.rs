//! 命令定义和实现

pub mod config;
pub mod r#move;
pub mod watch;

pub use config::{CliConfig, ConfigCommand};
pub use r#move::{ConnectionArgs, MoveCommand};
pub use watch::WatchCommand;
