//! 统一错误处理
//!
//! 各层使用独立的错误枚举，通过 `#[from]` 汇聚到 `BatchError`；
//! 对外通过 `ToPublicError` 映射为稳定的 `ErrorCode`

use thiserror::Error;

use crate::core::graph_element::ElementKey;
use crate::core::update_strategy::UpdateStrategy;
use crate::core::value::{Value, ValueShape};

pub mod codes;
pub mod schema;
pub mod storage;
pub mod validation;

pub use codes::{ErrorCategory, ErrorCode, PublicError, ToPublicError};
pub use schema::{SchemaError, SchemaResult};
pub use storage::{StorageError, StorageResult};
pub use validation::{ValidationError, ValidationErrorType};

/// 批量更新错误
///
/// 任一错误都使整个批次失败，不会出现部分提交
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    #[error("无效的批量请求: {0}")]
    InvalidBatch(#[from] ValidationError),

    #[error("第 {index} 个元素无效: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: SchemaError,
    },

    #[error("第 {index} 个元素不存在且不允许创建: {key}")]
    ElementNotFound { index: usize, key: ElementKey },

    #[error("第 {index} 个元素的端点顶点不存在: {id}")]
    VertexNotFound { index: usize, id: Value },

    #[error("第 {index} 个元素的属性 {property} 无法使用策略 {strategy}: 类型为 {shape}")]
    IncompatibleStrategy {
        index: usize,
        property: String,
        strategy: UpdateStrategy,
        shape: ValueShape,
    },

    #[error("第 {index} 个元素的属性 {property} 合并溢出: {detail}")]
    Overflow {
        index: usize,
        property: String,
        detail: String,
    },

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
}

/// 批量更新结果类型
pub type BatchResult<T> = Result<T, BatchError>;

impl BatchError {
    /// 出错元素在批次中的位置
    pub fn element_index(&self) -> Option<usize> {
        match self {
            BatchError::InvalidElement { index, .. }
            | BatchError::ElementNotFound { index, .. }
            | BatchError::VertexNotFound { index, .. }
            | BatchError::IncompatibleStrategy { index, .. }
            | BatchError::Overflow { index, .. } => Some(*index),
            BatchError::InvalidBatch(e) => match e.error_type {
                ValidationErrorType::NullElement { index } => Some(index),
                _ => None,
            },
            BatchError::Storage(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, BatchError::Storage(e) if e.is_retryable())
    }
}

impl ToPublicError for BatchError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            BatchError::InvalidBatch(_) => ErrorCode::ValidationError,
            BatchError::InvalidElement { .. } => ErrorCode::InvalidInput,
            BatchError::ElementNotFound { .. } | BatchError::VertexNotFound { .. } => {
                ErrorCode::ResourceNotFound
            }
            BatchError::IncompatibleStrategy { .. } => ErrorCode::TypeError,
            BatchError::Overflow { .. } => ErrorCode::ConstraintViolation,
            BatchError::Storage(se) => se.to_error_code(),
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            // 存储内部错误不暴露细节
            BatchError::Storage(se) => se.to_public_message(),
            _ => self.to_string(),
        }
    }
}
