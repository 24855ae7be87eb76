//! # jointctl CLI
//!
//! 把轴/关节目标转换为 G-code 并通过串口或 Moonraker HTTP 下发。
//!
//! ## One-shot 模式
//!
//! ```bash
//! # 配置默认传输
//! jointctl config set --transport http --host klipper.local
//!
//! # 关节 J1 相对移动 5，先发送 FAKE_HOME
//! jointctl move --j1 5 --relative --home-first
//!
//! # 只查看将要下发的命令
//! jointctl move --x 10 --y -2 --dry-run
//! ```
//!
//! ## 交互模式
//!
//! ```bash
//! $ jointctl shell
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod modes;
mod utils;

use commands::{CliConfig, ConfigCommand, ConnectionArgs, MoveCommand, WatchCommand};
use modes::interactive::run_shell;
use modes::oneshot::OneShotMode;

/// jointctl - G-code 运动命令工具
#[derive(Parser, Debug)]
#[command(name = "jointctl")]
#[command(about = "Send axis/joint moves as G-code over serial or Moonraker HTTP", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/jointctl/config.toml）
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 打印请求细节和控制器应答
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 构建并下发一次移动
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 交互式菜单
    Shell {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// 只显示命令，不下发
        #[arg(long)]
        dry_run: bool,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 打印串口传感器输出（Ctrl+C 停止）
    Watch {
        #[command(flatten)]
        args: WatchCommand,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "jointctl=debug" } else { "jointctl=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => CliConfig::default_path()?,
    };

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config_path),

        Commands::Move { args } => {
            let config = CliConfig::load(&config_path)?;
            OneShotMode::new(config, cli.verbose).move_to(args)
        },

        Commands::Shell {
            connection,
            dry_run,
        } => {
            let config = CliConfig::load(&config_path)?;
            let transport = connection.resolve(&config, cli.verbose)?;
            run_shell(&config, transport, dry_run, cli.verbose)
        },

        Commands::Watch { args } => args.execute(),
    }
}
