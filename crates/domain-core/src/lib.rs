//! domain-core - 联系方式标识符值对象
//!
//! 邮箱地址与电话号码两个不可变值对象，负责把用户输入解析为规范形式，
//! 并在规范形式上定义相等性。两者互不依赖。

mod error;
mod metrics;

pub mod email;
pub mod numbering_plan;
pub mod phone;
pub mod value_object;

pub use email::*;
pub use numbering_plan::*;
pub use phone::*;
pub use value_object::*;
