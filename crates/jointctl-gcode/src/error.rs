//! G-code 层错误类型定义

use crate::axis::Axis;
use thiserror::Error;

/// 解析/构建阶段错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// 既没有轴/关节目标，也没有原始脚本
    #[error("no axis or joint target specified (give at least one axis, joint or a raw command)")]
    NoTargetSpecified,

    /// 关节编号超出 1..=6
    #[error("invalid joint index {0} (expected 1..=6)")]
    InvalidJoint(u8),

    /// 无法识别的轴名
    #[error("unknown axis '{0}' (expected one of X, Y, Z, A, B, C)")]
    UnknownAxis(String),

    /// 目标值为 NaN 或无穷大
    #[error("target for axis {axis} is not a finite number")]
    NonFiniteTarget { axis: Axis },

    /// 进给速度为 NaN 或无穷大
    #[error("feed rate {0} is not a finite number")]
    NonFiniteFeed(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let msg = GcodeError::NoTargetSpecified.to_string();
        assert!(msg.starts_with("no axis or joint target"));

        assert_eq!(
            GcodeError::InvalidJoint(7).to_string(),
            "invalid joint index 7 (expected 1..=6)"
        );

        let msg = GcodeError::NonFiniteTarget { axis: Axis::B }.to_string();
        assert_eq!(msg, "target for axis B is not a finite number");

        assert_eq!(
            GcodeError::NonFiniteFeed(f64::INFINITY).to_string(),
            "feed rate inf is not a finite number"
        );
    }
}
