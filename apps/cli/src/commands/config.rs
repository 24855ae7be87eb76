//! 配置管理命令
//!
//! 用于管理 CLI 配置（默认传输、连接参数、进给速度等）

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use jointctl_gcode::DEFAULT_FEED;
use jointctl_transport::{HttpConfig, LineEnding, SerialConfig, TransportConfig, TransportKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认前置回零宏
pub const DEFAULT_HOME_MACRO: &str = "FAKE_HOME";

/// CLI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 默认传输
    pub transport: TransportKind,

    /// `move` 的默认进给速度（mm/min）
    pub feed: f64,

    /// `--home-first` 发送的宏
    pub home_macro: String,

    pub http: HttpConfig,

    pub serial: SerialConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            feed: DEFAULT_FEED,
            home_macro: DEFAULT_HOME_MACRO.to_string(),
            http: HttpConfig::default(),
            serial: SerialConfig::default(),
        }
    }
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("cannot determine config directory")?;
        path.push("jointctl");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// 保存配置（自动创建目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, format!("# jointctl configuration\n\n{content}"))
            .with_context(|| format!("failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// 按默认传输生成传输配置
    pub fn transport_config(&self) -> TransportConfig {
        match self.transport {
            TransportKind::Http => TransportConfig::Http(self.http.clone()),
            TransportKind::Serial => TransportConfig::Serial(self.serial.clone()),
        }
    }

    /// 读取单个配置项
    fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "transport" => self.transport.to_string(),
            "feed" => self.feed.to_string(),
            "home_macro" => self.home_macro.clone(),
            "http.host" => self.http.host.clone(),
            "http.port" => self.http.port.to_string(),
            "http.api_key" => self.http.api_key.clone().unwrap_or_else(|| "(unset)".to_string()),
            "http.timeout_secs" => self.http.timeout.as_secs_f64().to_string(),
            "serial.port" => self.serial.port.clone(),
            "serial.baud" => self.serial.baud.to_string(),
            "serial.timeout_secs" => self.serial.timeout.as_secs_f64().to_string(),
            "serial.wait_secs" => self.serial.wait.as_secs_f64().to_string(),
            "serial.line_ending" => self.serial.line_ending.to_string(),
            "serial.read_responses" => self.serial.read_responses.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 默认传输（http / serial）
        #[arg(long)]
        transport: Option<TransportKind>,

        /// Moonraker 主机
        #[arg(long)]
        host: Option<String>,

        /// Moonraker 端口
        #[arg(long)]
        http_port: Option<u16>,

        /// Moonraker API key（传空字符串清除）
        #[arg(long)]
        api_key: Option<String>,

        /// 串口设备路径
        #[arg(long)]
        device: Option<String>,

        /// 串口波特率
        #[arg(long)]
        baud: Option<u32>,

        /// 串口行结束符（lf / cr / crlf）
        #[arg(long)]
        line_ending: Option<LineEnding>,

        /// 默认进给速度
        #[arg(long)]
        feed: Option<f64>,

        /// `--home-first` 发送的宏
        #[arg(long)]
        home_macro: Option<String>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称（如 transport、http.host、serial.baud）
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,

    /// 打印配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set {
                transport,
                host,
                http_port,
                api_key,
                device,
                baud,
                line_ending,
                feed,
                home_macro,
            } => {
                let mut config = CliConfig::load(path)?;

                if let Some(kind) = transport {
                    config.transport = kind;
                    println!("✅ transport = {kind}");
                }
                if let Some(host) = host {
                    println!("✅ http.host = {host}");
                    config.http.host = host;
                }
                if let Some(port) = http_port {
                    config.http.port = port;
                    println!("✅ http.port = {port}");
                }
                if let Some(key) = api_key {
                    config.http.api_key = (!key.is_empty()).then_some(key);
                    println!("✅ http.api_key updated");
                }
                if let Some(device) = device {
                    println!("✅ serial.port = {device}");
                    config.serial.port = device;
                }
                if let Some(baud) = baud {
                    config.serial.baud = baud;
                    println!("✅ serial.baud = {baud}");
                }
                if let Some(ending) = line_ending {
                    config.serial.line_ending = ending;
                    println!("✅ serial.line_ending = {ending}");
                }
                if let Some(feed) = feed {
                    config.feed = feed;
                    println!("✅ feed = {feed}");
                }
                if let Some(name) = home_macro {
                    println!("✅ home_macro = {name}");
                    config.home_macro = name;
                }

                config.save(path)
            },

            ConfigCommand::Get { key } => {
                let config = CliConfig::load(path)?;

                if key == "all" {
                    print!("{}", toml::to_string_pretty(&config).context("failed to serialize config")?);
                    return Ok(());
                }

                match config.value_of(&key) {
                    Some(value) => println!("{value}"),
                    None => bail!("unknown config key '{key}'"),
                }
                Ok(())
            },

            ConfigCommand::Check => {
                let config = CliConfig::load(path)?;

                println!("Config file: {}", path.display());
                if !path.exists() {
                    println!("  (not found, using defaults)");
                }
                println!("  transport: {}", config.transport);
                println!("  target:    {}", config.transport_config().target());
                println!("  feed:      {}", config.feed);
                println!("  home:      {}", config.home_macro);
                Ok(())
            },

            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }
}
