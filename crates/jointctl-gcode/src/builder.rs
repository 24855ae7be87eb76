//! G-code 脚本构建

use crate::axis::AxisTarget;
use crate::request::MoveRequest;
use std::fmt;

const ABSOLUTE_POSITIONING: &str = "G90";
const RELATIVE_POSITIONING: &str = "G91";
const LINEAR_MOVE: &str = "G1";

/// 有序的 G-code 行序列
///
/// 行顺序即下发顺序。由 [`build`] 生成，保证非空且不含空白行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScript(Vec<String>);

impl CommandScript {
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 以 `\n` 连接为单个脚本文本（不带结尾换行）
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }
}

impl fmt::Display for CommandScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// 数值的最简文本形式
///
/// 无多余的尾随零、无小数点后的 `.0`、只有负数带符号；`-0` 输出为 `0`。
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// 把运动请求转换为 G-code 脚本
///
/// - 前置命令按顺序原样放在最前面（空白行跳过）
/// - 存在原始脚本时按 `\n`、`\r\n`、`\r` 拆分、去掉空白行后原样输出，不做相对模式包装
/// - 否则生成 `G1 <轴...> F<进给>`，轴按 X, Y, Z, A, B, C 排列；
///   相对模式下包装为 `G91` / 移动 / `G90`
pub fn build(request: &MoveRequest) -> CommandScript {
    let mut lines: Vec<String> = request
        .pre_commands()
        .iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect();

    if let Some(raw) = request.raw_override() {
        lines.extend(
            raw.split(['\r', '\n'])
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        return CommandScript(lines);
    }

    let move_line = move_line(request.targets(), request.feed());
    if request.is_relative() {
        lines.push(RELATIVE_POSITIONING.to_string());
        lines.push(move_line);
        lines.push(ABSOLUTE_POSITIONING.to_string());
    } else {
        lines.push(move_line);
    }

    CommandScript(lines)
}

fn move_line(targets: &AxisTarget, feed: f64) -> String {
    let mut line = String::from(LINEAR_MOVE);
    for (axis, value) in targets.iter() {
        line.push(' ');
        line.push(axis.letter());
        line.push_str(&format_number(value));
    }
    line.push_str(" F");
    line.push_str(&format_number(feed));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Axis, Joint};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn test_build_relative_single_axis() {
        let request = MoveRequest::builder()
            .axis(Axis::X, 5.0)
            .feed(1200.0)
            .relative(true)
            .build()
            .unwrap();

        assert_eq!(build(&request).lines(), ["G91", "G1 X5 F1200", "G90"]);
    }

    #[test]
    fn test_build_absolute_two_axes() {
        let request = MoveRequest::builder()
            .axis(Axis::Y, -2.0)
            .axis(Axis::X, 5.0)
            .feed(1200.0)
            .build()
            .unwrap();

        assert_eq!(build(&request).lines(), ["G1 X5 Y-2 F1200"]);
    }

    #[test]
    fn test_build_joint_targets_use_mapped_axes() {
        let request = MoveRequest::builder()
            .joint(Joint::J6, 15.0)
            .joint(Joint::J1, 5.0)
            .feed(400.0)
            .relative(true)
            .pre_command("FAKE_HOME")
            .build()
            .unwrap();

        assert_eq!(
            build(&request).lines(),
            ["FAKE_HOME", "G91", "G1 X5 C15 F400", "G90"]
        );
    }

    #[test]
    fn test_build_raw_override_passthrough() {
        let request = MoveRequest::builder()
            .raw("G28\n\n  \nG1 X10 F3000\r\nM400\n")
            .relative(true)
            .axis(Axis::Z, 1.0)
            .build()
            .unwrap();

        assert_eq!(build(&request).lines(), ["G28", "G1 X10 F3000", "M400"]);
    }

    #[test]
    fn test_build_raw_override_splits_on_bare_cr() {
        let request = MoveRequest::builder().raw("G28\rM400\r\rG90").build().unwrap();

        assert_eq!(build(&request).lines(), ["G28", "M400", "G90"]);
    }

    #[test]
    fn test_build_pre_commands_precede_raw() {
        let request = MoveRequest::builder()
            .raw("SET_PIN PIN=led VALUE=1")
            .pre_commands(["FAKE_HOME", "", "M17"])
            .build()
            .unwrap();

        assert_eq!(
            build(&request).lines(),
            ["FAKE_HOME", "M17", "SET_PIN PIN=led VALUE=1"]
        );
    }

    #[test]
    fn test_build_emits_non_positive_feed_as_given() {
        let request = MoveRequest::builder()
            .axis(Axis::A, 1.5)
            .feed(-10.0)
            .build()
            .unwrap();

        assert_eq!(build(&request).lines(), ["G1 A1.5 F-10"]);
    }

    #[test]
    fn test_script_joined_and_display() {
        let request = MoveRequest::builder()
            .axis(Axis::X, 1.0)
            .relative(true)
            .build()
            .unwrap();
        let script = build(&request);

        assert_eq!(script.joined(), "G91\nG1 X1 F1200\nG90");
        assert_eq!(script.to_string(), "G91\nG1 X1 F1200\nG90\n");
        assert_eq!(script.len(), 3);
    }
}
