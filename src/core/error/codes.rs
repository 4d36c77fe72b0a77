//! 对外错误码定义
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (00=成功, 02=执行, 03=验证, 05=资源, 09=系统)
//! - YY: 具体错误
//!
//! 错误码一旦定义不应随意修改，调用方依赖其数值

use serde::{Deserialize, Serialize};

/// 对外错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorCode {
    // ==================== 成功 (00xx) ====================
    #[default]
    Success = 0,

    // ==================== 执行错误 (02xx) ====================
    /// 通用执行错误
    ExecutionError = 200,
    /// 等待锁超时
    Timeout = 201,
    /// 并发冲突
    Conflict = 203,

    // ==================== 验证错误 (03xx) ====================
    /// 批量请求不合法
    ValidationError = 300,
    /// 策略与属性类型不匹配
    TypeError = 301,
    /// 元素无效（标签未知、缺少主键等）
    InvalidInput = 302,
    /// 约束违反（如数值溢出）
    ConstraintViolation = 303,

    // ==================== 资源错误 (05xx) ====================
    /// 元素未找到
    ResourceNotFound = 500,
    /// 元素已存在
    ResourceAlreadyExists = 501,

    // ==================== 系统错误 (09xx) ====================
    /// 内部错误
    InternalError = 900,
    /// 未知错误
    Unknown = 999,
}

impl ErrorCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Success),
            200 => Some(ErrorCode::ExecutionError),
            201 => Some(ErrorCode::Timeout),
            203 => Some(ErrorCode::Conflict),
            300 => Some(ErrorCode::ValidationError),
            301 => Some(ErrorCode::TypeError),
            302 => Some(ErrorCode::InvalidInput),
            303 => Some(ErrorCode::ConstraintViolation),
            500 => Some(ErrorCode::ResourceNotFound),
            501 => Some(ErrorCode::ResourceAlreadyExists),
            900 => Some(ErrorCode::InternalError),
            999 => Some(ErrorCode::Unknown),
            _ => None,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_i32() {
            0 => ErrorCategory::Success,
            200..=299 => ErrorCategory::Execution,
            300..=399 => ErrorCategory::Validation,
            500..=599 => ErrorCategory::Resource,
            900..=999 => ErrorCategory::System,
            _ => ErrorCategory::Unknown,
        }
    }

    /// 获取默认的错误消息
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "成功",
            ErrorCode::ExecutionError => "执行错误",
            ErrorCode::Timeout => "等待锁超时",
            ErrorCode::Conflict => "并发冲突",
            ErrorCode::ValidationError => "批量请求不合法",
            ErrorCode::TypeError => "更新策略与属性类型不匹配",
            ErrorCode::InvalidInput => "无效元素",
            ErrorCode::ConstraintViolation => "约束违反",
            ErrorCode::ResourceNotFound => "元素不存在",
            ErrorCode::ResourceAlreadyExists => "元素已存在",
            ErrorCode::InternalError => "内部错误",
            ErrorCode::Unknown => "未知错误",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// 调用方请求本身有误
    pub fn is_client_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation | ErrorCategory::Resource)
    }

    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::Timeout | ErrorCode::Conflict)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.default_message())
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Success,
    Execution,
    Validation,
    Resource,
    System,
    Unknown,
}

/// 对外错误信息 - 用于序列化到响应中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicError {
    pub code: ErrorCode,
    pub message: String,
}

impl PublicError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 使用默认消息创建错误
    pub fn with_default_message(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }
}

/// 内部错误到对外错误的转换 trait
///
/// 实现此 trait 可以将内部错误转换为对外错误，过滤敏感信息
pub trait ToPublicError {
    fn to_public_error(&self) -> PublicError {
        PublicError::new(self.to_error_code(), self.to_public_message())
    }

    fn to_error_code(&self) -> ErrorCode;

    /// 获取对外错误消息（过滤敏感信息）
    fn to_public_message(&self) -> String;
}
