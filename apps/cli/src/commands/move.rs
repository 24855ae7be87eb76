//! 移动命令
//!
//! 把轴/关节参数转换为 `MoveRequest`，并按命令行覆盖配置文件选择传输

use crate::commands::CliConfig;
use anyhow::{Context, Result, bail};
use clap::Args;
use jointctl_gcode::{Axis, AxisInputs, Joint, JointInputs, MoveRequest};
use jointctl_transport::{LineEnding, TransportConfig, TransportKind};
use std::time::Duration;

/// 移动命令参数
#[derive(Args, Debug, Default)]
pub struct MoveCommand {
    /// X 轴目标（绝对或相对）
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Y 轴目标
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Z 轴目标
    #[arg(long, allow_negative_numbers = true)]
    pub z: Option<f64>,

    /// A 轴目标
    #[arg(long, allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// B 轴目标
    #[arg(long, allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// C 轴目标
    #[arg(long, allow_negative_numbers = true)]
    pub c: Option<f64>,

    /// 关节 J1 目标（映射到 X）
    #[arg(long, allow_negative_numbers = true)]
    pub j1: Option<f64>,

    /// 关节 J2 目标（映射到 Y）
    #[arg(long, allow_negative_numbers = true)]
    pub j2: Option<f64>,

    /// 关节 J3 目标（映射到 Z）
    #[arg(long, allow_negative_numbers = true)]
    pub j3: Option<f64>,

    /// 关节 J4 目标（映射到 A）
    #[arg(long, allow_negative_numbers = true)]
    pub j4: Option<f64>,

    /// 关节 J5 目标（映射到 B）
    #[arg(long, allow_negative_numbers = true)]
    pub j5: Option<f64>,

    /// 关节 J6 目标（映射到 C）
    #[arg(long, allow_negative_numbers = true)]
    pub j6: Option<f64>,

    /// J1..J6 目标，逗号分隔，空位表示不移动
    /// 例如：5,,-2
    #[arg(short, long, allow_hyphen_values = true)]
    pub joints: Option<String>,

    /// 原始 G-code（可多行），原样下发
    #[arg(long)]
    pub command: Option<String>,

    /// 用 G91/G90 包装，目标值视为偏移
    #[arg(long)]
    pub relative: bool,

    /// 进给速度（默认取配置文件）
    #[arg(long, allow_negative_numbers = true)]
    pub feed: Option<f64>,

    /// 移动前发送回零宏（默认 FAKE_HOME）
    #[arg(long)]
    pub home_first: bool,

    /// 额外的前置命令，可重复
    #[arg(long = "pre", value_name = "LINE")]
    pub pre_commands: Vec<String>,

    /// 只显示命令，不下发
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl MoveCommand {
    fn axis_inputs(&self) -> AxisInputs {
        let values = [self.x, self.y, self.z, self.a, self.b, self.c];
        let mut inputs = AxisInputs::new();
        for (axis, value) in Axis::ALL.into_iter().zip(values) {
            inputs.set(axis, value);
        }
        inputs
    }

    /// 合并 `--joints` 与 `--j1..--j6`（单独的关节参数优先）
    pub fn joint_inputs(&self) -> Result<JointInputs> {
        let mut inputs = match &self.joints {
            Some(list) => parse_joint_list(list)?,
            None => JointInputs::new(),
        };

        let values = [self.j1, self.j2, self.j3, self.j4, self.j5, self.j6];
        for (joint, value) in Joint::ALL.into_iter().zip(values) {
            if value.is_some() {
                inputs.set(joint, value);
            }
        }
        Ok(inputs)
    }

    /// 生成运动请求
    pub fn to_request(&self, config: &CliConfig) -> Result<MoveRequest> {
        let mut builder = MoveRequest::builder()
            .axes(self.axis_inputs())
            .joints(self.joint_inputs()?)
            .feed(self.feed.unwrap_or(config.feed))
            .relative(self.relative);

        if self.home_first {
            builder = builder.pre_command(config.home_macro.clone());
        }
        builder = builder.pre_commands(self.pre_commands.iter().cloned());

        if let Some(raw) = &self.command {
            builder = builder.raw(raw.clone());
        }

        builder.build().context("resolve failed")
    }
}

/// 解析逗号分隔的关节列表
///
/// 空位表示该关节不移动；最多 6 项。
pub fn parse_joint_list(list: &str) -> Result<JointInputs> {
    let entries: Vec<&str> = list.split(',').map(str::trim).collect();

    if entries.len() > Joint::ALL.len() {
        bail!("at most 6 joints are supported, got {}", entries.len());
    }

    let mut inputs = JointInputs::new();
    for (joint, entry) in Joint::ALL.into_iter().zip(entries) {
        if entry.is_empty() {
            continue;
        }
        let value = entry
            .parse::<f64>()
            .with_context(|| format!("invalid value for {joint}: '{entry}'"))?;
        inputs.set(joint, Some(value));
    }

    if inputs.is_empty() {
        bail!("--joints given but no joint value found");
    }
    Ok(inputs)
}

/// 连接参数（覆盖配置文件）
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// 传输（http / serial）
    #[arg(long)]
    pub transport: Option<TransportKind>,

    /// Moonraker 主机
    #[arg(long)]
    pub host: Option<String>,

    /// Moonraker 端口
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Moonraker API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// HTTP 请求超时（秒）
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<f64>,

    /// 串口设备路径（如 /dev/ttyUSB0、COM3）
    #[arg(long)]
    pub device: Option<String>,

    /// 串口波特率
    #[arg(long)]
    pub baud: Option<u32>,

    /// 串口应答超时（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// 每行之间的等待（秒）
    #[arg(long, value_name = "SECS")]
    pub wait: Option<f64>,

    /// 串口行结束符（lf / cr / crlf）
    #[arg(long)]
    pub line_ending: Option<LineEnding>,
}

impl ConnectionArgs {
    /// 合并配置文件与命令行参数
    ///
    /// `verbose` 时串口会读取每行应答。
    pub fn resolve(&self, config: &CliConfig, verbose: bool) -> Result<TransportConfig> {
        let kind = self.transport.unwrap_or(config.transport);

        match kind {
            TransportKind::Http => {
                let mut http = config.http.clone();
                if let Some(host) = &self.host {
                    http.host = host.clone();
                }
                if let Some(port) = self.http_port {
                    http.port = port;
                }
                if let Some(key) = &self.api_key {
                    http.api_key = Some(key.clone());
                }
                if let Some(secs) = self.http_timeout {
                    http.timeout = seconds("--http-timeout", secs)?;
                }
                Ok(TransportConfig::Http(http))
            },
            TransportKind::Serial => {
                let mut serial = config.serial.clone();
                if let Some(device) = &self.device {
                    serial.port = device.clone();
                }
                if let Some(baud) = self.baud {
                    serial.baud = baud;
                }
                if let Some(secs) = self.timeout {
                    serial.timeout = seconds("--timeout", secs)?;
                }
                if let Some(secs) = self.wait {
                    serial.wait = seconds("--wait", secs)?;
                }
                if let Some(ending) = self.line_ending {
                    serial.line_ending = ending;
                }
                serial.read_responses |= verbose;
                Ok(TransportConfig::Serial(serial))
            },
        }
    }
}

fn seconds(flag: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| format!("{flag} must be a non-negative number of seconds"))
}
