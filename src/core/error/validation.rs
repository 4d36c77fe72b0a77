//! 验证错误类型
//!
//! 批量请求在执行前的结构检查失败时返回

use serde::{Deserialize, Serialize};
use std::fmt;

/// 验证错误类型枚举
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorType {
    MissingElements,
    EmptyElements,
    NullElement { index: usize },
    MissingStrategies,
    EmptyStrategies,
    TooManyElements,
    MixedElementKinds,
    EmptyPropertyName,
}

impl fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorType::MissingElements => write!(f, "缺少元素列表"),
            ValidationErrorType::EmptyElements => write!(f, "元素列表为空"),
            ValidationErrorType::NullElement { index } => write!(f, "第 {} 个元素为空", index),
            ValidationErrorType::MissingStrategies => write!(f, "缺少更新策略"),
            ValidationErrorType::EmptyStrategies => write!(f, "更新策略为空"),
            ValidationErrorType::TooManyElements => write!(f, "元素过多"),
            ValidationErrorType::MixedElementKinds => write!(f, "元素种类混合"),
            ValidationErrorType::EmptyPropertyName => write!(f, "属性名为空"),
        }
    }
}

/// 验证错误结构
///
/// 包含错误类型、错误消息和可选的上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub error_type: ValidationErrorType,
    pub context: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, error_type: ValidationErrorType) -> Self {
        Self {
            message: message.into(),
            error_type,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
