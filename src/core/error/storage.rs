//! 存储层错误类型

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 存储层结果类型
pub type StorageResult<T> = Result<T, StorageError>;

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("数据库错误: {0}")]
    DbError(String),
    #[error("未找到: {0}")]
    NotFound(String),
    #[error("已存在: {0}")]
    AlreadyExists(String),
    #[error("锁错误: {0}")]
    LockError(String),
    #[error("锁超时: {0}")]
    LockTimeout(String),
    #[error("无效输入: {0}")]
    InvalidInput(String),
}

impl StorageError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::LockTimeout(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::DbError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::InvalidInput(e.to_string())
    }
}

impl From<String> for StorageError {
    fn from(s: String) -> Self {
        StorageError::DbError(s)
    }
}

impl From<&str> for StorageError {
    fn from(s: &str) -> Self {
        StorageError::DbError(s.to_string())
    }
}

impl ToPublicError for StorageError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            StorageError::NotFound(_) => ErrorCode::ResourceNotFound,
            StorageError::AlreadyExists(_) => ErrorCode::ResourceAlreadyExists,
            StorageError::InvalidInput(_) => ErrorCode::InvalidInput,
            StorageError::LockTimeout(_) => ErrorCode::Timeout,
            _ => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            StorageError::NotFound(name) => format!("资源不存在: {}", name),
            StorageError::AlreadyExists(name) => format!("资源已存在: {}", name),
            StorageError::LockTimeout(_) => "等待元素锁超时，请稍后重试".to_string(),
            _ => "存储操作失败".to_string(),
        }
    }
}
