//! 传输配置
//!
//! 进程启动时选定一次，之后不可变。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 传输类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Serial,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Http => write!(f, "http"),
            TransportKind::Serial => write!(f, "serial"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "moonraker" => Ok(TransportKind::Http),
            "serial" => Ok(TransportKind::Serial),
            other => Err(format!("unknown transport '{other}' (expected http or serial)")),
        }
    }
}

/// 串口行结束符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    CrLf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// 配置文件/命令行中使用的名字
    pub const fn name(self) -> &'static str {
        match self {
            LineEnding::Lf => "lf",
            LineEnding::Cr => "cr",
            LineEnding::CrLf => "crlf",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "cr" => Ok(LineEnding::Cr),
            "crlf" => Ok(LineEnding::CrLf),
            other => Err(format!("unknown line ending '{other}' (expected lf, cr or crlf)")),
        }
    }
}

/// 串口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// 设备路径（如 /dev/ttyUSB0、COM3）
    pub port: String,

    /// 波特率
    pub baud: u32,

    /// 读写超时
    #[serde(rename = "timeout_secs", with = "secs")]
    pub timeout: Duration,

    /// 每行之间的等待时间
    #[serde(rename = "wait_secs", with = "secs")]
    pub wait: Duration,

    pub line_ending: LineEnding,

    /// 每行写出后是否读取一行应答
    pub read_responses: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud: 115_200,
            timeout: Duration::from_secs(5),
            wait: Duration::from_millis(100),
            line_ending: LineEnding::Lf,
            read_responses: false,
        }
    }
}

/// Moonraker HTTP 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,

    /// 可选 API key，非空时以 `X-Api-Key` 头发送
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// 请求超时
    #[serde(rename = "timeout_secs", with = "secs")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7125,
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl HttpConfig {
    /// 脚本接口地址
    pub fn script_url(&self) -> String {
        format!("http://{}:{}/printer/gcode/script", self.host, self.port)
    }

    /// 非空的 API key
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// 选定的传输及其配置
#[derive(Debug, Clone, PartialEq)]
pub enum TransportConfig {
    Serial(SerialConfig),
    Http(HttpConfig),
}

impl TransportConfig {
    pub fn kind(&self) -> TransportKind {
        match self {
            TransportConfig::Serial(_) => TransportKind::Serial,
            TransportConfig::Http(_) => TransportKind::Http,
        }
    }

    /// 人类可读的目标描述
    pub fn target(&self) -> String {
        match self {
            TransportConfig::Serial(config) => format!("{} @ {} baud", config.port, config.baud),
            TransportConfig::Http(config) => config.script_url(),
        }
    }
}

/// `Duration` 以浮点秒数读写
mod secs {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
