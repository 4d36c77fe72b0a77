//! 批量更新服务
//!
//! 供异步调用方使用：批次在阻塞线程池中执行，等锁不会阻塞异步运行时

use std::sync::Arc;
use thiserror::Error;
use tokio::task;

use crate::core::error::{BatchError, ErrorCode, ToPublicError};
use crate::core::types::BatchRequest;
use crate::storage::mutate::{BatchExecutor, BatchOutcome};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{0}")]
    Batch(#[from] BatchError),
    #[error("任务执行失败: {0}")]
    Task(String),
}

impl ToPublicError for ServiceError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Batch(e) => e.to_error_code(),
            ServiceError::Task(_) => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            ServiceError::Batch(e) => e.to_public_message(),
            ServiceError::Task(_) => "内部错误".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BatchService {
    executor: Arc<dyn BatchExecutor>,
}

impl BatchService {
    pub fn new(executor: Arc<dyn BatchExecutor>) -> Self {
        Self { executor }
    }

    /// 执行批量更新
    pub async fn update_batch(&self, request: BatchRequest) -> Result<BatchOutcome, ServiceError> {
        let executor = Arc::clone(&self.executor);
        let result = task::spawn_blocking(move || executor.execute_batch(request))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))?;
        Ok(result?)
    }

    /// 只验证请求，不访问存储
    pub fn check(&self, request: &BatchRequest) -> Result<(), ServiceError> {
        Ok(self.executor.validate(request)?)
    }
}
