//! 存储层数据修改模块
//!
//! 批量属性合并，包括：
//! - 请求验证
//! - 元素键计算与查找
//! - 按策略合并并写回
//! - 元素键级别的内存锁

pub mod batch_processor;
pub mod key_matcher;
pub mod lock_manager;
pub mod validator;

pub use batch_processor::BatchUpdateProcessor;
pub use key_matcher::{KeyMatcher, ResolvedKey};
pub use lock_manager::{LockGuard, MemoryLockManager};
pub use validator::ElementValidator;

use serde::Serialize;

use crate::core::error::BatchResult;
use crate::core::graph_element::GraphElement;
use crate::core::types::BatchRequest;

/// 批量更新结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// 按输入顺序排列的结果元素
    pub elements: Vec<GraphElement>,
    pub created: usize,
    pub updated: usize,
}

impl BatchOutcome {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            created: 0,
            updated: 0,
        }
    }
}

/// 批量处理器 trait
pub trait BatchExecutor: Send + Sync {
    fn execute_batch(&self, request: BatchRequest) -> BatchResult<BatchOutcome>;

    /// 只执行验证阶段
    fn validate(&self, request: &BatchRequest) -> BatchResult<()>;
}
