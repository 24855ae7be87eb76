//! 轴、关节与轴目标解析
//!
//! 关节 J1..J6 一一映射到轴 X/Y/Z/A/B/C，映射表是编译期常量。

use crate::error::GcodeError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 运动轴
///
/// 变体声明顺序即规范输出顺序（X, Y, Z, A, B, C），`Ord` 由此派生。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
}

impl Axis {
    /// 规范顺序的全部轴
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    /// G-code 中使用的轴字母
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Axis {
    type Err = GcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            "A" => Ok(Axis::A),
            "B" => Ok(Axis::B),
            "C" => Ok(Axis::C),
            _ => Err(GcodeError::UnknownAxis(s.to_string())),
        }
    }
}

/// 关节编号（1..=6）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Joint(u8);

impl Joint {
    pub const J1: Joint = Joint(1);
    pub const J2: Joint = Joint(2);
    pub const J3: Joint = Joint(3);
    pub const J4: Joint = Joint(4);
    pub const J5: Joint = Joint(5);
    pub const J6: Joint = Joint(6);

    pub const ALL: [Joint; 6] = [
        Joint::J1,
        Joint::J2,
        Joint::J3,
        Joint::J4,
        Joint::J5,
        Joint::J6,
    ];

    /// 从 1 起始的编号创建关节
    ///
    /// # 错误
    /// 编号不在 1..=6 时返回 [`GcodeError::InvalidJoint`]
    pub fn new(index: u8) -> Result<Self, GcodeError> {
        if (1..=6).contains(&index) {
            Ok(Joint(index))
        } else {
            Err(GcodeError::InvalidJoint(index))
        }
    }

    /// 从 1 起始的编号
    pub const fn index(self) -> u8 {
        self.0
    }

    /// 该关节驱动的轴
    pub const fn axis(self) -> Axis {
        JOINT_MAP[self.slot()].1
    }

    const fn slot(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for Joint {
    type Error = GcodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Joint::new(value)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// 关节到轴的固定映射：J1→X, J2→Y, J3→Z, J4→A, J5→B, J6→C
pub const JOINT_MAP: [(Joint, Axis); 6] = [
    (Joint::J1, Axis::X),
    (Joint::J2, Axis::Y),
    (Joint::J3, Axis::Z),
    (Joint::J4, Axis::A),
    (Joint::J5, Axis::B),
    (Joint::J6, Axis::C),
];

/// 直接给出的轴值（每个轴可选）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisInputs([Option<f64>; 6]);

impl AxisInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置某个轴的值（链式）
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, Some(value));
        self
    }

    pub fn set(&mut self, axis: Axis, value: Option<f64>) {
        self.0[axis.slot()] = value;
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.0[axis.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// 按规范顺序遍历已给出的轴值
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.get(axis).map(|v| (axis, v)))
    }
}

/// 关节值（J1..J6 每个可选）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointInputs([Option<f64>; 6]);

impl JointInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置某个关节的值（链式）
    pub fn with(mut self, joint: Joint, value: f64) -> Self {
        self.set(joint, Some(value));
        self
    }

    pub fn set(&mut self, joint: Joint, value: Option<f64>) {
        self.0[joint.slot()] = value;
    }

    pub fn get(&self, joint: Joint) -> Option<f64> {
        self.0[joint.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, f64)> + '_ {
        Joint::ALL
            .into_iter()
            .filter_map(|joint| self.get(joint).map(|v| (joint, v)))
    }
}

/// 规范的轴目标集合
///
/// 每个轴至多一个值，所有值都是有限数；遍历顺序恒为 X, Y, Z, A, B, C。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTarget(BTreeMap<Axis, f64>);

impl AxisTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖某个轴的目标
    ///
    /// # 错误
    /// 值为 NaN 或无穷大时返回 [`GcodeError::NonFiniteTarget`]
    pub fn insert(&mut self, axis: Axis, value: f64) -> Result<Option<f64>, GcodeError> {
        if !value.is_finite() {
            return Err(GcodeError::NonFiniteTarget { axis });
        }
        Ok(self.0.insert(axis, value))
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.0.get(&axis).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按规范顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.0.iter().map(|(&axis, &value)| (axis, value))
    }
}

/// 合并直接轴值与关节值
///
/// 先取直接轴值，再把每个给出的关节值映射到对应轴并覆盖同名轴。
///
/// # 错误
/// - 合并结果为空时返回 [`GcodeError::NoTargetSpecified`]
/// - 任一最终值不是有限数时返回 [`GcodeError::NonFiniteTarget`]
pub fn resolve(direct: &AxisInputs, joints: &JointInputs) -> Result<AxisTarget, GcodeError> {
    let mut merged: BTreeMap<Axis, f64> = direct.iter().collect();

    for (joint, axis) in JOINT_MAP {
        if let Some(value) = joints.get(joint) {
            merged.insert(axis, value);
        }
    }

    if merged.is_empty() {
        return Err(GcodeError::NoTargetSpecified);
    }

    let mut target = AxisTarget::new();
    for (axis, value) in merged {
        target.insert(axis, value)?;
    }
    Ok(target)
}
