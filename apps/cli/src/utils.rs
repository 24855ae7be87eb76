//! 用户交互工具
//!
//! Ctrl+C 中断标志和结果输出

use anyhow::{Context, Result};
use jointctl_driver::Outcome;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static INTERRUPT: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// 进程级中断标志
///
/// 首次调用时安装 Ctrl+C 处理器：第一次按下置位标志（串口在下一行之前停止并关闭），
/// 第二次按下直接退出进程。
pub fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    if let Some(flag) = INTERRUPT.get() {
        return Ok(Arc::clone(flag));
    }

    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("\n⚠️  Interrupt received, stopping (press Ctrl+C again to force quit)");
    })
    .context("failed to install Ctrl+C handler")?;

    Ok(Arc::clone(INTERRUPT.get_or_init(|| flag)))
}

/// 打印调度结果
pub fn print_outcome(outcome: &Outcome, verbose: bool) {
    match outcome {
        Outcome::DryRun { script } => {
            println!("Commands that would be sent:");
            print!("{script}");
        },
        Outcome::Sent {
            kind,
            script,
            delivery,
        } => {
            println!("✅ Sent {} of {} lines via {kind}", delivery.lines_sent, script.len());
            if verbose {
                for response in &delivery.responses {
                    println!("<< {response}");
                }
            }
        },
    }
}
