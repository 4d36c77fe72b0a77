//! 批量属性合并处理器
//!
//! 分两个阶段执行：
//! 1. 计划：验证请求、计算键、锁定所有键、查找已存在元素并按策略合并
//! 2. 应用：按输入顺序创建或替换属性
//!
//! 除存储错误外，所有错误都在第一次写入之前返回

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::key_matcher::{KeyMatcher, ResolvedKey};
use super::lock_manager::{MemoryLockManager, DEFAULT_LOCK_WAIT};
use super::validator::ElementValidator;
use super::{BatchExecutor, BatchOutcome};
use crate::config::Config;
use crate::core::error::{BatchError, BatchResult, SchemaError};
use crate::core::graph_element::{ElementKey, GraphElement, Properties};
use crate::core::types::BatchRequest;
use crate::core::update_strategy::{MergeError, UpdateStrategy};
use crate::storage::metadata::SchemaManager;
use crate::storage::StorageClient;

/// 计划阶段产生的写操作
#[derive(Debug)]
enum PlannedWrite {
    Create(GraphElement),
    Replace(Properties),
}

/// 批量更新处理器
///
/// 同一存储上的多个处理器应共享同一个锁管理器
pub struct BatchUpdateProcessor<S: StorageClient> {
    storage: Arc<Mutex<S>>,
    key_matcher: KeyMatcher,
    lock_manager: Arc<MemoryLockManager>,
    /// 等待元素锁的超时，与锁管理器无关
    lock_wait: Duration,
    validator: ElementValidator,
}

impl<S: StorageClient> Clone for BatchUpdateProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key_matcher: self.key_matcher.clone(),
            lock_manager: Arc::clone(&self.lock_manager),
            lock_wait: self.lock_wait,
            validator: self.validator,
        }
    }
}

impl<S: StorageClient> std::fmt::Debug for BatchUpdateProcessor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchUpdateProcessor")
            .field("lock_manager", &self.lock_manager)
            .field("lock_wait", &self.lock_wait)
            .field("validator", &self.validator)
            .finish()
    }
}

impl<S: StorageClient> BatchUpdateProcessor<S> {
    pub fn new(storage: Arc<Mutex<S>>, schema: Arc<dyn SchemaManager>) -> Self {
        Self {
            storage,
            key_matcher: KeyMatcher::new(schema),
            lock_manager: Arc::new(MemoryLockManager::new()),
            lock_wait: DEFAULT_LOCK_WAIT,
            validator: ElementValidator::default(),
        }
    }

    /// 按配置设置批次上限与等锁超时，保留已设置的锁管理器
    pub fn with_config(mut self, config: &Config) -> Self {
        self.validator = ElementValidator::new(config.batch.max_elements);
        self.lock_wait = Duration::from_millis(config.lock.wait_timeout_ms);
        self
    }

    pub fn with_lock_manager(mut self, lock_manager: Arc<MemoryLockManager>) -> Self {
        self.lock_manager = lock_manager;
        self
    }

    pub fn storage(&self) -> &Arc<Mutex<S>> {
        &self.storage
    }

    pub fn lock_manager(&self) -> &Arc<MemoryLockManager> {
        &self.lock_manager
    }

    pub fn lock_wait(&self) -> Duration {
        self.lock_wait
    }

    pub fn key_matcher(&self) -> &KeyMatcher {
        &self.key_matcher
    }

    /// 不经合并直接写入元素，用于加载初始数据
    ///
    /// 与批量更新一样先锁定所有键；键已存在时返回存储错误，之前的元素已写入
    pub fn load_elements(&self, elements: Vec<GraphElement>) -> BatchResult<Vec<GraphElement>> {
        let keys = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                self.key_matcher
                    .key_of(element)
                    .map_err(|e| schema_error(index, e))
            })
            .collect::<BatchResult<Vec<ElementKey>>>()?;

        let _guard = self
            .lock_manager
            .lock_batch_within(keys.iter().cloned(), self.lock_wait)?;

        let mut loaded = Vec::with_capacity(elements.len());
        for (key, element) in keys.iter().zip(elements) {
            loaded.push(self.storage.lock().create(key, element)?);
        }
        log::info!("已加载 {} 个元素", loaded.len());
        Ok(loaded)
    }

    /// 执行批量更新，返回按输入顺序排列的结果元素
    pub fn execute(&self, request: BatchRequest) -> BatchResult<Vec<GraphElement>> {
        self.execute_with_outcome(request).map(|outcome| outcome.elements)
    }

    /// 执行批量更新，同时返回创建与更新的计数
    pub fn execute_with_outcome(&self, request: BatchRequest) -> BatchResult<BatchOutcome> {
        metrics::counter!("graphmerge_batches_total").increment(1);
        let result = self.run(request);
        match &result {
            Ok(outcome) => {
                metrics::counter!("graphmerge_elements_created_total").increment(outcome.created as u64);
                metrics::counter!("graphmerge_elements_updated_total").increment(outcome.updated as u64);
                log::info!(
                    "批量更新完成: 共 {} 个元素，创建 {}，更新 {}",
                    outcome.elements.len(),
                    outcome.created,
                    outcome.updated
                );
            }
            Err(e) => {
                metrics::counter!("graphmerge_batches_rejected_total").increment(1);
                log::warn!("批量更新被拒绝: {}", e);
            }
        }
        result
    }

    fn run(&self, request: BatchRequest) -> BatchResult<BatchOutcome> {
        self.validator.validate(&request)?;

        let strategies = request.strategies.unwrap_or_default();
        let elements: Vec<GraphElement> = request
            .elements
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        let resolved = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                self.key_matcher
                    .resolve(element)
                    .map_err(|e| schema_error(index, e))
            })
            .collect::<BatchResult<Vec<ResolvedKey>>>()?;

        let _guard = self
            .lock_manager
            .lock_batch_within(resolved.iter().map(|r| r.key.clone()), self.lock_wait)?;

        if request.check_vertex {
            self.check_endpoints(&elements)?;
        }

        let plan = self.plan(elements, &resolved, &strategies, request.create_if_not_exist)?;
        self.apply(plan)
    }

    // 边的端点顶点必须已存在
    fn check_endpoints(&self, elements: &[GraphElement]) -> BatchResult<()> {
        let storage = self.storage.lock();
        for (index, element) in elements.iter().enumerate() {
            if let Some(edge) = element.as_edge() {
                for id in [&edge.source, &edge.target] {
                    if !storage.vertex_exists(id)? {
                        return Err(BatchError::VertexNotFound {
                            index,
                            id: id.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn plan(
        &self,
        elements: Vec<GraphElement>,
        resolved: &[ResolvedKey],
        strategies: &HashMap<String, UpdateStrategy>,
        create_if_not_exist: bool,
    ) -> BatchResult<Vec<(ElementKey, PlannedWrite)>> {
        // 同一批次内重复的键与前面元素的计划结果合并
        let mut overlay: HashMap<ElementKey, GraphElement> = HashMap::new();
        let mut plan = Vec::with_capacity(elements.len());

        for (index, (element, resolved)) in elements.into_iter().zip(resolved).enumerate() {
            let key = &resolved.key;
            let existing = match overlay.get(key) {
                Some(planned) => Some(planned.clone()),
                None => self.storage.lock().find_by_key(key)?,
            };

            match existing {
                None => {
                    if !create_if_not_exist {
                        return Err(BatchError::ElementNotFound {
                            index,
                            key: key.clone(),
                        });
                    }
                    log::debug!("元素 {} 不存在，将创建", key);
                    overlay.insert(key.clone(), element.clone());
                    plan.push((key.clone(), PlannedWrite::Create(element)));
                }
                Some(existing) => {
                    let merged = self.merge_properties(
                        index,
                        &existing,
                        &element,
                        strategies,
                        &resolved.key_properties,
                    )?;
                    log::debug!("元素 {} 已存在，合并 {} 个属性", key, element.properties().len());
                    overlay.insert(key.clone(), existing.with_properties(merged.clone()));
                    plan.push((key.clone(), PlannedWrite::Replace(merged)));
                }
            }
        }
        Ok(plan)
    }

    fn merge_properties(
        &self,
        index: usize,
        existing: &GraphElement,
        incoming: &GraphElement,
        strategies: &HashMap<String, UpdateStrategy>,
        key_properties: &[String],
    ) -> BatchResult<Properties> {
        let mut merged = existing.properties().clone();

        let mut names: Vec<&String> = incoming.properties().keys().collect();
        names.sort();
        for name in names {
            if key_properties.contains(name) {
                continue;
            }
            let Some(value) = incoming.property(name) else {
                continue;
            };
            let new_value = match strategies.get(name.as_str()) {
                Some(strategy) => {
                    self.check_declared_shape(index, name, *strategy)?;
                    strategy
                        .merge(existing.property(name), value)
                        .map_err(|e| Self::merge_error(index, name, e))?
                }
                None => value.clone(),
            };
            merged.insert(name.clone(), new_value);
        }
        Ok(merged)
    }

    // 策略必须适用于属性声明的形态
    fn check_declared_shape(&self, index: usize, name: &str, strategy: UpdateStrategy) -> BatchResult<()> {
        let declared = self
            .key_matcher
            .schema()
            .get_property_key(name)
            .map_err(|e| schema_error(index, e))?;
        match declared {
            Some(pk) if !strategy.accepts(pk.shape()) => Err(BatchError::IncompatibleStrategy {
                index,
                property: name.to_string(),
                strategy,
                shape: pk.shape(),
            }),
            _ => Ok(()),
        }
    }

    fn apply(&self, plan: Vec<(ElementKey, PlannedWrite)>) -> BatchResult<BatchOutcome> {
        let mut outcome = BatchOutcome::with_capacity(plan.len());
        for (key, write) in plan {
            let element = match write {
                PlannedWrite::Create(element) => {
                    outcome.created += 1;
                    self.storage.lock().create(&key, element)?
                }
                PlannedWrite::Replace(properties) => {
                    outcome.updated += 1;
                    self.storage.lock().replace_properties(&key, properties)?
                }
            };
            outcome.elements.push(element);
        }
        Ok(outcome)
    }

    fn merge_error(index: usize, property: &str, error: MergeError) -> BatchError {
        match error {
            MergeError::Incompatible { strategy, shape } => BatchError::IncompatibleStrategy {
                index,
                property: property.to_string(),
                strategy,
                shape,
            },
            MergeError::Overflow { detail, .. } => BatchError::Overflow {
                index,
                property: property.to_string(),
                detail,
            },
        }
    }
}

impl<S: StorageClient + 'static> BatchExecutor for BatchUpdateProcessor<S> {
    fn execute_batch(&self, request: BatchRequest) -> BatchResult<BatchOutcome> {
        self.execute_with_outcome(request)
    }

    fn validate(&self, request: &BatchRequest) -> BatchResult<()> {
        Ok(self.validator.validate(request)?)
    }
}

// 存储错误原样传递，其余 Schema 错误归为无效元素
fn schema_error(index: usize, error: SchemaError) -> BatchError {
    match error {
        SchemaError::Storage(e) => BatchError::Storage(e),
        source => BatchError::InvalidElement { index, source },
    }
}
