use crate::core::error::{SchemaError, SchemaResult, StorageError};
use crate::core::graph_element::ElementKind;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use super::types::{Cardinality, EdgeLabel, PropertyKey, SchemaDefinition, VertexLabel};

/// Schema 查询接口，批量更新只读取 Schema
pub trait SchemaManager: Send + Sync + Debug {
    fn get_vertex_label(&self, name: &str) -> SchemaResult<Option<VertexLabel>>;
    fn get_edge_label(&self, name: &str) -> SchemaResult<Option<EdgeLabel>>;
    fn get_property_key(&self, name: &str) -> SchemaResult<Option<PropertyKey>>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySchemaManager {
    property_keys: Arc<Mutex<HashMap<String, PropertyKey>>>,
    vertex_labels: Arc<Mutex<HashMap<String, VertexLabel>>>,
    edge_labels: Arc<Mutex<HashMap<String, EdgeLabel>>>,
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> SchemaError {
    SchemaError::Storage(StorageError::LockError(e.to_string()))
}

impl MemorySchemaManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按定义依次创建属性、顶点标签、边标签
    pub fn from_definition(definition: &SchemaDefinition) -> SchemaResult<Self> {
        let manager = Self::new();
        for pk in &definition.property_keys {
            manager.create_property_key(pk.clone())?;
        }
        for vl in &definition.vertex_labels {
            manager.create_vertex_label(vl.clone())?;
        }
        for el in &definition.edge_labels {
            manager.create_edge_label(el.clone())?;
        }
        Ok(manager)
    }

    /// 创建属性
    ///
    /// 已存在相同定义时返回 `Ok(false)`，定义不同则报冲突
    pub fn create_property_key(&self, key: PropertyKey) -> SchemaResult<bool> {
        let mut keys = self.property_keys.lock().map_err(lock_err)?;
        if let Some(existing) = keys.get(&key.name) {
            return Self::check_same(existing, &key, &key.name);
        }
        keys.insert(key.name.clone(), key);
        Ok(true)
    }

    pub fn create_vertex_label(&self, label: VertexLabel) -> SchemaResult<bool> {
        if label.primary_keys.is_empty() {
            return Err(SchemaError::Conflict(format!(
                "顶点标签 {} 必须声明主键",
                label.name
            )));
        }
        self.check_properties(&label.name, &label.properties, &label.primary_keys)?;

        let mut labels = self.vertex_labels.lock().map_err(lock_err)?;
        if let Some(existing) = labels.get(&label.name) {
            return Self::check_same(existing, &label, &label.name);
        }
        labels.insert(label.name.clone(), label);
        Ok(true)
    }

    pub fn create_edge_label(&self, label: EdgeLabel) -> SchemaResult<bool> {
        self.check_properties(&label.name, &label.properties, &label.sort_keys)?;
        {
            let vertex_labels = self.vertex_labels.lock().map_err(lock_err)?;
            for endpoint in [&label.source_label, &label.target_label] {
                if !vertex_labels.contains_key(endpoint) {
                    return Err(SchemaError::LabelNotFound {
                        kind: ElementKind::Vertex,
                        label: endpoint.clone(),
                    });
                }
            }
        }

        let mut labels = self.edge_labels.lock().map_err(lock_err)?;
        if let Some(existing) = labels.get(&label.name) {
            return Self::check_same(existing, &label, &label.name);
        }
        labels.insert(label.name.clone(), label);
        Ok(true)
    }

    fn check_same<T: PartialEq>(existing: &T, incoming: &T, name: &str) -> SchemaResult<bool> {
        if existing == incoming {
            Ok(false)
        } else {
            Err(SchemaError::Conflict(format!("{} 已存在且定义不同", name)))
        }
    }

    // 所有属性必须已创建，键属性必须是标签的单值属性
    fn check_properties(&self, label: &str, properties: &[String], keys: &[String]) -> SchemaResult<()> {
        let property_keys = self.property_keys.lock().map_err(lock_err)?;
        for name in properties {
            if !property_keys.contains_key(name) {
                return Err(SchemaError::PropertyKeyNotFound(name.clone()));
            }
        }
        for key in keys {
            if !properties.contains(key) {
                return Err(SchemaError::Conflict(format!(
                    "标签 {} 的键属性 {} 不在属性列表中",
                    label, key
                )));
            }
            if property_keys
                .get(key)
                .is_some_and(|pk| pk.cardinality != Cardinality::Single)
            {
                return Err(SchemaError::Conflict(format!(
                    "标签 {} 的键属性 {} 必须是单值属性",
                    label, key
                )));
            }
        }
        Ok(())
    }
}

impl SchemaManager for MemorySchemaManager {
    fn get_vertex_label(&self, name: &str) -> SchemaResult<Option<VertexLabel>> {
        let labels = self.vertex_labels.lock().map_err(lock_err)?;
        Ok(labels.get(name).cloned())
    }

    fn get_edge_label(&self, name: &str) -> SchemaResult<Option<EdgeLabel>> {
        let labels = self.edge_labels.lock().map_err(lock_err)?;
        Ok(labels.get(name).cloned())
    }

    fn get_property_key(&self, name: &str) -> SchemaResult<Option<PropertyKey>> {
        let keys = self.property_keys.lock().map_err(lock_err)?;
        Ok(keys.get(name).cloned())
    }
}
