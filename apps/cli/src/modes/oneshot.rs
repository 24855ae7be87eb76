//! One-shot 模式
//!
//! 每个命令独立执行：
//! 1. 读取配置
//! 2. 构建请求
//! 3. dry-run 打印，或连接、下发、断开

use anyhow::Result;
use jointctl_driver::Dispatcher;
use std::sync::atomic::Ordering;
use tracing::debug;

use crate::commands::{CliConfig, MoveCommand};
use crate::utils;

/// One-shot 模式
pub struct OneShotMode {
    config: CliConfig,
    verbose: bool,
}

impl OneShotMode {
    pub fn new(config: CliConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    /// 移动命令
    pub fn move_to(&self, args: MoveCommand) -> Result<()> {
        let request = args.to_request(&self.config)?;
        let transport = args.connection.resolve(&self.config, self.verbose)?;
        debug!(?request, destination = %transport.target(), dry_run = args.dry_run, "move request built");

        if args.dry_run {
            let outcome = Dispatcher::new(transport).dispatch(&request, true)?;
            utils::print_outcome(&outcome, self.verbose);
            return Ok(());
        }

        println!("📡 Sending to {}", transport.target());

        let interrupt = utils::interrupt_flag()?;
        interrupt.store(false, Ordering::SeqCst);

        let dispatcher = Dispatcher::new(transport).with_interrupt(interrupt);
        if self.verbose {
            let preview = dispatcher.dispatch(&request, true)?;
            print!("{}", preview.script());
        }

        let outcome = dispatcher.dispatch(&request, false)?;
        utils::print_outcome(&outcome, self.verbose);

        Ok(())
    }
}
