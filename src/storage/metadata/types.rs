use serde::{Deserialize, Serialize};

use crate::core::value::{Value, ValueShape};

/// 属性值的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    Text,
    Date,
    Bool,
}

impl DataType {
    pub fn shape(&self) -> ValueShape {
        match self {
            DataType::Int | DataType::Float => ValueShape::Numeric,
            DataType::Text => ValueShape::Text,
            DataType::Date => ValueShape::Temporal,
            DataType::Bool => ValueShape::Boolean,
        }
    }

    /// 单个值是否为该类型
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (DataType::Int, Value::Int(_))
                | (DataType::Float, Value::Float(_))
                | (DataType::Text, Value::String(_))
                | (DataType::Date, Value::Date(_))
                | (DataType::Bool, Value::Bool(_))
        )
    }
}

/// 属性基数：单值、集合或列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    Set,
    List,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyKey {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl PropertyKey {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            cardinality: Cardinality::Single,
        }
    }

    pub fn value_set(mut self) -> Self {
        self.cardinality = Cardinality::Set;
        self
    }

    pub fn value_list(mut self) -> Self {
        self.cardinality = Cardinality::List;
        self
    }

    /// 声明的值形态，集合与列表优先于元素类型
    pub fn shape(&self) -> ValueShape {
        match self.cardinality {
            Cardinality::Single => self.data_type.shape(),
            Cardinality::Set => ValueShape::Set,
            Cardinality::List => ValueShape::List,
        }
    }
}

/// 顶点标签，`primary_keys` 按声明顺序组成顶点的键
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexLabel {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<String>,
    pub primary_keys: Vec<String>,
}

impl VertexLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            primary_keys: Vec::new(),
        }
    }

    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn primary_keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = names.into_iter().map(Into::into).collect();
        self
    }
}

/// 边标签，`sort_keys` 区分同一对端点间的多条边
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub name: String,
    pub source_label: String,
    pub target_label: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub sort_keys: Vec<String>,
}

impl EdgeLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_label: String::new(),
            target_label: String::new(),
            properties: Vec::new(),
            sort_keys: Vec::new(),
        }
    }

    pub fn link(mut self, source_label: impl Into<String>, target_label: impl Into<String>) -> Self {
        self.source_label = source_label.into();
        self.target_label = target_label.into();
        self
    }

    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort_keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_keys = names.into_iter().map(Into::into).collect();
        self
    }
}

/// 整体 Schema 定义，用于从 JSON 文件加载
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub property_keys: Vec<PropertyKey>,
    #[serde(default)]
    pub vertex_labels: Vec<VertexLabel>,
    #[serde(default)]
    pub edge_labels: Vec<EdgeLabel>,
}
