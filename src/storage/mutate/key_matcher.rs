//! 元素键匹配
//!
//! 根据 Schema 计算元素的键：顶点使用标签声明的主键属性，
//! 边使用起点、终点与标签声明的排序键属性。查找是只读的

use std::sync::Arc;

use crate::core::error::{SchemaError, SchemaResult};
use crate::core::graph_element::{ElementKey, ElementKind, GraphElement};
use crate::core::Value;
use crate::storage::metadata::SchemaManager;
use crate::storage::StorageClient;

/// 已解析的键及其键属性名
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKey {
    pub key: ElementKey,
    /// 组成键的属性名，合并时保持不变
    pub key_properties: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct KeyMatcher {
    schema: Arc<dyn SchemaManager>,
}

impl KeyMatcher {
    pub fn new(schema: Arc<dyn SchemaManager>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Arc<dyn SchemaManager> {
        &self.schema
    }

    /// 计算元素的键
    pub fn key_of(&self, element: &GraphElement) -> SchemaResult<ElementKey> {
        self.resolve(element).map(|r| r.key)
    }

    /// 计算元素的键，并返回组成键的属性名
    pub fn resolve(&self, element: &GraphElement) -> SchemaResult<ResolvedKey> {
        match element {
            GraphElement::Vertex(vertex) => {
                let label = self.schema.get_vertex_label(&vertex.label)?.ok_or_else(|| {
                    SchemaError::LabelNotFound {
                        kind: ElementKind::Vertex,
                        label: vertex.label.clone(),
                    }
                })?;
                let primary_values = self.key_values(element, &label.name, &label.primary_keys)?;
                Ok(ResolvedKey {
                    key: ElementKey::Vertex {
                        label: label.name,
                        primary_values,
                    },
                    key_properties: label.primary_keys,
                })
            }
            GraphElement::Edge(edge) => {
                let label = self.schema.get_edge_label(&edge.label)?.ok_or_else(|| {
                    SchemaError::LabelNotFound {
                        kind: ElementKind::Edge,
                        label: edge.label.clone(),
                    }
                })?;
                for (endpoint, id, given, declared) in [
                    ("起点", &edge.source, &edge.source_label, &label.source_label),
                    ("终点", &edge.target, &edge.target_label, &label.target_label),
                ] {
                    match id {
                        Value::Null => {
                            return Err(SchemaError::MissingEndpoint {
                                label: label.name.clone(),
                                endpoint,
                            })
                        }
                        Value::String(_) | Value::Int(_) => {}
                        other => {
                            return Err(SchemaError::InvalidEndpoint {
                                label: label.name.clone(),
                                endpoint,
                                id: other.clone(),
                            })
                        }
                    }
                    if let Some(given) = given {
                        if given != declared {
                            return Err(SchemaError::Conflict(format!(
                                "边 {} 的{}标签应为 {}，实际为 {}",
                                label.name, endpoint, declared, given
                            )));
                        }
                    }
                }
                let sort_values = self.key_values(element, &label.name, &label.sort_keys)?;
                Ok(ResolvedKey {
                    key: ElementKey::Edge {
                        label: label.name,
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        sort_values,
                    },
                    key_properties: label.sort_keys,
                })
            }
        }
    }

    /// 查找与元素键相同的已存在元素
    pub fn lookup<S>(&self, storage: &S, element: &GraphElement) -> SchemaResult<Option<GraphElement>>
    where
        S: StorageClient + ?Sized,
    {
        let key = self.key_of(element)?;
        Ok(storage.find_by_key(&key)?)
    }

    // 键属性值必须存在且与声明的类型一致
    fn key_values(&self, element: &GraphElement, label: &str, names: &[String]) -> SchemaResult<Vec<Value>> {
        names
            .iter()
            .map(|name| {
                let value = match element.property(name) {
                    Some(value) if !value.is_null() => value,
                    _ => {
                        return Err(SchemaError::MissingKeyProperty {
                            label: label.to_string(),
                            property: name.clone(),
                        })
                    }
                };
                let declared = self
                    .schema
                    .get_property_key(name)?
                    .ok_or_else(|| SchemaError::PropertyKeyNotFound(name.clone()))?;
                if !declared.data_type.matches(value) {
                    return Err(SchemaError::KeyTypeMismatch {
                        label: label.to_string(),
                        property: name.clone(),
                        expected: declared.data_type,
                    });
                }
                Ok(value.clone())
            })
            .collect()
    }
}
