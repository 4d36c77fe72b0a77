//! 集成测试共享工具模块
//!
//! 提供测试基础设施和辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

use graphmerge::config::Config;
use graphmerge::core::{ElementKey, GraphElement};
use graphmerge::storage::metadata::{
    DataType, EdgeLabel, MemorySchemaManager, PropertyKey, VertexLabel,
};
use graphmerge::storage::{BatchUpdateProcessor, MemoryStorage, StorageClient, StorageStats};
use parking_lot::Mutex;
use std::sync::Arc;

/// 每批元素个数
pub const BATCH_SIZE: usize = 5;

/// 创建 `object`/`person` 顶点标签与 `updates`/`transfers` 边标签
///
/// `person` 以 (name, city) 为复合主键，`transfers` 以 seq 为排序键
pub fn prepare_schema() -> MemorySchemaManager {
    let schema = MemorySchemaManager::new();
    for key in [
        PropertyKey::new("name", DataType::Text),
        PropertyKey::new("price", DataType::Int),
        PropertyKey::new("date", DataType::Date),
        PropertyKey::new("set", DataType::Text).value_set(),
        PropertyKey::new("list", DataType::Text).value_list(),
        PropertyKey::new("city", DataType::Text),
        PropertyKey::new("seq", DataType::Int),
    ] {
        schema.create_property_key(key).expect("创建属性失败");
    }

    schema
        .create_vertex_label(
            VertexLabel::new("object")
                .properties(["name", "price", "date", "set", "list"])
                .primary_keys(["name"]),
        )
        .expect("创建顶点标签失败");
    schema
        .create_vertex_label(
            VertexLabel::new("person")
                .properties(["name", "city", "price"])
                .primary_keys(["name", "city"]),
        )
        .expect("创建顶点标签失败");

    schema
        .create_edge_label(
            EdgeLabel::new("transfers")
                .link("object", "object")
                .properties(["seq", "price"])
                .sort_keys(["seq"]),
        )
        .expect("创建边标签失败");
    schema
        .create_edge_label(
            EdgeLabel::new("updates")
                .link("object", "object")
                .properties(["name", "price", "date", "set", "list"]),
        )
        .expect("创建边标签失败");
    schema
}

/// 测试上下文，每个测试使用独立的内存存储
pub struct TestContext {
    pub storage: Arc<Mutex<MemoryStorage>>,
    pub processor: BatchUpdateProcessor<MemoryStorage>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let processor = BatchUpdateProcessor::new(Arc::clone(&storage), Arc::new(prepare_schema()))
            .with_config(config);
        Self { storage, processor }
    }

    /// 写入元素，已存在的元素整体覆盖属性
    pub fn add_elements<I, E>(&self, elements: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<GraphElement>,
    {
        let mut storage = self.storage.lock();
        for element in elements {
            let element = element.into();
            let key = self.key_of(&element);
            let exists = storage.find_by_key(&key).expect("查找失败").is_some();
            if exists {
                storage
                    .replace_properties(&key, element.properties().clone())
                    .expect("覆盖元素失败");
            } else {
                storage.create(&key, element).expect("创建元素失败");
            }
        }
    }

    pub fn key_of(&self, element: &GraphElement) -> ElementKey {
        self.processor
            .key_matcher()
            .key_of(element)
            .expect("计算键失败")
    }

    /// 按元素的键重新查询存储
    pub fn find(&self, element: impl Into<GraphElement>) -> Option<GraphElement> {
        let key = self.key_of(&element.into());
        self.storage.lock().find_by_key(&key).expect("查找失败")
    }

    pub fn stats(&self) -> StorageStats {
        self.storage.lock().get_storage_stats()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
