//! # jointctl G-code 层
//!
//! 纯函数层，不做任何 IO：
//! - 轴/关节解析（`resolve`）：把直接给出的轴值和 J1..J6 关节值合并为一个规范的轴目标集合
//! - 运动请求（`MoveRequest`）：一次调用的不可变工作单元
//! - 脚本构建（`build`）：把运动请求转换为有序的 G-code 行序列
//!
//! ```
//! use jointctl_gcode::{Axis, AxisInputs, JointInputs, MoveRequest, build};
//!
//! let request = MoveRequest::builder()
//!     .axes(AxisInputs::new().with(Axis::X, 5.0))
//!     .joints(JointInputs::new())
//!     .feed(1200.0)
//!     .relative(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(build(&request).lines(), ["G91", "G1 X5 F1200", "G90"]);
//! ```

mod axis;
mod builder;
mod error;
mod request;

pub use axis::{Axis, AxisInputs, AxisTarget, JOINT_MAP, Joint, JointInputs, resolve};
pub use builder::{CommandScript, build, format_number};
pub use error::GcodeError;
pub use request::{DEFAULT_FEED, MoveRequest, MoveRequestBuilder};
