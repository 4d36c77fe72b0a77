//! Value 模块 - 属性值类型系统
//!
//! 此模块提供了顶点/边属性值的类型系统，包括：
//! - 核心类型定义 (`types.rs`)
//! - 比较逻辑 (`comparison.rs`)
//! - 算术运算 (`operations.rs`)

pub mod comparison;
pub mod operations;
pub mod types;

pub use types::*;
