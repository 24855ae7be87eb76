//! 运动请求
//!
//! `MoveRequest` 在每次调用时构建一次，之后不可变。

use crate::axis::{Axis, AxisInputs, AxisTarget, Joint, JointInputs, resolve};
use crate::error::GcodeError;

/// 默认进给速度（mm/min）
pub const DEFAULT_FEED: f64 = 1200.0;

/// 一次运动请求
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    targets: AxisTarget,
    feed: f64,
    relative: bool,
    raw_override: Option<String>,
    pre_commands: Vec<String>,
}

impl MoveRequest {
    pub fn builder() -> MoveRequestBuilder {
        MoveRequestBuilder::default()
    }

    /// 解析后的轴目标（存在原始脚本时可能为空）
    pub fn targets(&self) -> &AxisTarget {
        &self.targets
    }

    pub fn feed(&self) -> f64 {
        self.feed
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn raw_override(&self) -> Option<&str> {
        self.raw_override.as_deref()
    }

    pub fn pre_commands(&self) -> &[String] {
        &self.pre_commands
    }
}

/// `MoveRequest` 构建器
#[derive(Debug, Clone)]
pub struct MoveRequestBuilder {
    axes: AxisInputs,
    joints: JointInputs,
    feed: f64,
    relative: bool,
    raw_override: Option<String>,
    pre_commands: Vec<String>,
}

impl Default for MoveRequestBuilder {
    fn default() -> Self {
        Self {
            axes: AxisInputs::new(),
            joints: JointInputs::new(),
            feed: DEFAULT_FEED,
            relative: false,
            raw_override: None,
            pre_commands: Vec::new(),
        }
    }
}

impl MoveRequestBuilder {
    /// 替换全部直接轴值
    pub fn axes(mut self, axes: AxisInputs) -> Self {
        self.axes = axes;
        self
    }

    /// 替换全部关节值
    pub fn joints(mut self, joints: JointInputs) -> Self {
        self.joints = joints;
        self
    }

    pub fn axis(mut self, axis: Axis, value: f64) -> Self {
        self.axes.set(axis, Some(value));
        self
    }

    pub fn joint(mut self, joint: Joint, value: f64) -> Self {
        self.joints.set(joint, Some(value));
        self
    }

    pub fn feed(mut self, feed: f64) -> Self {
        self.feed = feed;
        self
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// 原始 G-code 脚本（可多行），原样下发
    pub fn raw(mut self, script: impl Into<String>) -> Self {
        self.raw_override = Some(script.into());
        self
    }

    /// 追加一条前置命令（如 `FAKE_HOME`）
    pub fn pre_command(mut self, line: impl Into<String>) -> Self {
        self.pre_commands.push(line.into());
        self
    }

    pub fn pre_commands<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_commands.extend(lines.into_iter().map(Into::into));
        self
    }

    /// 解析轴/关节输入并生成请求
    ///
    /// 空白的原始脚本视为未提供。
    ///
    /// # 错误
    /// - 没有任何目标且没有原始脚本：[`GcodeError::NoTargetSpecified`]
    /// - 目标值不是有限数：[`GcodeError::NonFiniteTarget`]
    /// - 进给速度不是有限数：[`GcodeError::NonFiniteFeed`]
    pub fn build(self) -> Result<MoveRequest, GcodeError> {
        if !self.feed.is_finite() {
            return Err(GcodeError::NonFiniteFeed(self.feed));
        }

        let raw_override = self.raw_override.filter(|raw| !raw.trim().is_empty());

        let targets = match resolve(&self.axes, &self.joints) {
            Ok(targets) => targets,
            Err(GcodeError::NoTargetSpecified) if raw_override.is_some() => AxisTarget::new(),
            Err(e) => return Err(e),
        };

        Ok(MoveRequest {
            targets,
            feed: self.feed,
            relative: self.relative,
            raw_override,
            pre_commands: self.pre_commands,
        })
    }
}
