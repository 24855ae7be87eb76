//! watch 命令
//!
//! 打开串口，逐行打印传感器（ESP32 + AS5600）输出，直到 Ctrl+C。
//! 与运动下发互不相关，只是一个独立的串口读取器。

use crate::utils;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::Ordering;
use std::time::Duration;

/// 串口读取参数
#[derive(Args, Debug)]
pub struct WatchCommand {
    /// 串口设备路径（如 /dev/ttyUSB2）
    pub port: String,

    /// 波特率
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
}

impl WatchCommand {
    pub fn execute(&self) -> Result<()> {
        println!("⏳ Opening {} at {} baud...", self.port, self.baud);

        let port = serialport::new(&self.port, self.baud)
            .timeout(Duration::from_secs(1))
            .open()
            .with_context(|| format!("could not open serial port {}", self.port))?;

        println!("✅ Connected. Press Ctrl+C to stop.\n");

        let interrupt = utils::interrupt_flag()?;
        interrupt.store(false, Ordering::SeqCst);

        let mut reader = BufReader::new(port);
        let mut buf = Vec::new();

        while !interrupt.load(Ordering::SeqCst) {
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    println!("\nDevice closed.");
                    return Ok(());
                },
                Ok(_) if buf.ends_with(b"\n") => {
                    if let Some(line) = decode_line(&buf) {
                        println!("{line}");
                    }
                    buf.clear();
                },
                Ok(_) => {},
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {},
                Err(e) => return Err(e).context("serial read failed"),
            }
        }

        println!("\nStopping.");
        Ok(())
    }
}

/// 解码一行输出（非 UTF-8 字节替换），空行返回 `None`
fn decode_line(bytes: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(bytes).trim().to_string();
    (!line.is_empty()).then_some(line)
}
