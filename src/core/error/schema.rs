//! Schema 相关错误

use thiserror::Error;

use crate::core::error::storage::StorageError;
use crate::core::graph_element::ElementKind;
use crate::core::value::Value;
use crate::storage::metadata::DataType;

/// Schema 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{kind} 标签不存在: {label}")]
    LabelNotFound { kind: ElementKind, label: String },

    #[error("属性不存在: {0}")]
    PropertyKeyNotFound(String),

    #[error("标签 {label} 的键属性 {property} 缺失或为空")]
    MissingKeyProperty { label: String, property: String },

    #[error("标签 {label} 的键属性 {property} 应为 {expected:?} 类型")]
    KeyTypeMismatch {
        label: String,
        property: String,
        expected: DataType,
    },

    #[error("边 {label} 的{endpoint}为空")]
    MissingEndpoint { label: String, endpoint: &'static str },

    #[error("边 {label} 的{endpoint}id {id} 必须是字符串或整数")]
    InvalidEndpoint {
        label: String,
        endpoint: &'static str,
        id: Value,
    },

    #[error("Schema冲突: {0}")]
    Conflict(String),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
}

/// Schema 操作结果类型
pub type SchemaResult<T> = Result<T, SchemaError>;
