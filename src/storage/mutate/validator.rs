//! 批量请求验证
//!
//! 执行前检查请求结构，失败时不会发生任何读写

use crate::core::error::{ValidationError, ValidationErrorType};
use crate::core::types::BatchRequest;

/// 默认的单批次元素上限
pub const DEFAULT_MAX_ELEMENTS: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct ElementValidator {
    max_elements: usize,
}

impl ElementValidator {
    pub fn new(max_elements: usize) -> Self {
        Self { max_elements }
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// 按顺序检查，返回第一个失败项
    pub fn validate(&self, request: &BatchRequest) -> Result<(), ValidationError> {
        let elements = request.elements.as_ref().ok_or_else(|| {
            ValidationError::new("请求必须包含元素列表", ValidationErrorType::MissingElements)
        })?;
        if elements.is_empty() {
            return Err(ValidationError::new(
                "元素列表不能为空",
                ValidationErrorType::EmptyElements,
            ));
        }
        if let Some(index) = elements.iter().position(Option::is_none) {
            return Err(ValidationError::new(
                "元素不能为空",
                ValidationErrorType::NullElement { index },
            ));
        }

        let strategies = request.strategies.as_ref().ok_or_else(|| {
            ValidationError::new("请求必须包含更新策略", ValidationErrorType::MissingStrategies)
        })?;
        if strategies.is_empty() {
            return Err(ValidationError::new(
                "更新策略不能为空",
                ValidationErrorType::EmptyStrategies,
            ));
        }

        if elements.len() > self.max_elements {
            return Err(ValidationError::new(
                format!("元素个数 {} 超过上限 {}", elements.len(), self.max_elements),
                ValidationErrorType::TooManyElements,
            ));
        }

        let mut kinds = elements.iter().flatten().map(|e| e.kind());
        if let Some(first) = kinds.next() {
            if let Some(other) = kinds.find(|k| *k != first) {
                return Err(ValidationError::new(
                    "同一批次只能包含顶点或边",
                    ValidationErrorType::MixedElementKinds,
                )
                .with_context(format!("{} 与 {}", first, other)));
            }
        }

        if strategies.keys().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::new(
                "更新策略的属性名不能为空",
                ValidationErrorType::EmptyPropertyName,
            ));
        }

        Ok(())
    }
}

impl Default for ElementValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ELEMENTS)
    }
}
