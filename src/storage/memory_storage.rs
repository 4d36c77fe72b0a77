use super::{StorageClient, StorageStats};
use crate::core::graph_element::{ElementKey, GraphElement, Properties};
use crate::core::{StorageError, Value};
use std::collections::{HashMap, HashSet};

/// 内存存储
///
/// 元素按键存放；并发访问由调用方通过外层互斥锁保证
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    elements: HashMap<ElementKey, GraphElement>,
    vertex_ids: HashSet<Value>,
    vertices: usize,
    edges: usize,
    writes: u64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有元素，按键排序
    pub fn scan_all(&self) -> Vec<GraphElement> {
        let mut keys: Vec<&ElementKey> = self.elements.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| self.elements.get(k).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl StorageClient for MemoryStorage {
    fn find_by_key(&self, key: &ElementKey) -> Result<Option<GraphElement>, StorageError> {
        Ok(self.elements.get(key).cloned())
    }

    fn vertex_exists(&self, id: &Value) -> Result<bool, StorageError> {
        Ok(self.vertex_ids.contains(id))
    }

    fn create(&mut self, key: &ElementKey, mut element: GraphElement) -> Result<GraphElement, StorageError> {
        if element.kind() != key.kind() || element.label() != key.label() {
            return Err(StorageError::InvalidInput(format!(
                "元素 {} {} 与键 {} 不匹配",
                element.kind(),
                element.label(),
                key
            )));
        }
        if self.elements.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        let id = key.element_id();
        match key {
            ElementKey::Vertex { .. } => {
                // 顶点id必须唯一
                if !self.vertex_ids.insert(id.clone()) {
                    return Err(StorageError::AlreadyExists(id.to_string()));
                }
                self.vertices += 1;
            }
            ElementKey::Edge { .. } => self.edges += 1,
        }
        element.set_id(id);
        self.elements.insert(key.clone(), element.clone());
        self.writes += 1;
        Ok(element)
    }

    fn replace_properties(
        &mut self,
        key: &ElementKey,
        properties: Properties,
    ) -> Result<GraphElement, StorageError> {
        let element = self
            .elements
            .get_mut(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        *element.properties_mut() = properties;
        self.writes += 1;
        Ok(element.clone())
    }

    fn get_storage_stats(&self) -> StorageStats {
        StorageStats {
            total_vertices: self.vertices,
            total_edges: self.edges,
            total_writes: self.writes,
        }
    }
}
