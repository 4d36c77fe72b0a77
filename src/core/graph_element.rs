use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::value::Value;

/// 属性名到属性值的映射
pub type Properties = HashMap<String, Value>;

/// 图元素种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "vertex"),
            ElementKind::Edge => write!(f, "edge"),
        }
    }
}

/// Represents a vertex in the graph
///
/// `id` is assigned by storage when the vertex is created, derived from the
/// label and its primary-key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub label: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Vertex {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Get a specific property by name
    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }
}

/// Represents an edge in the graph
///
/// `source`/`target` hold the ids of the endpoint vertices. Edges between the
/// same endpoints with the same label are told apart by the label's sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub label: String,
    pub source: Value,
    pub target: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    pub fn new(label: impl Into<String>, source: impl Into<Value>, target: impl Into<Value>) -> Self {
        Self {
            id: None,
            label: label.into(),
            source: source.into(),
            target: target.into(),
            source_label: None,
            target_label: None,
            properties: HashMap::new(),
        }
    }

    /// 设置端点顶点的标签
    pub fn with_endpoint_labels(
        mut self,
        source_label: impl Into<String>,
        target_label: impl Into<String>,
    ) -> Self {
        self.source_label = Some(source_label.into());
        self.target_label = Some(target_label.into());
        self
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Get a specific property by name
    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }
}

/// 顶点或边
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GraphElement {
    Vertex(Vertex),
    Edge(Edge),
}

impl GraphElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            GraphElement::Vertex(_) => ElementKind::Vertex,
            GraphElement::Edge(_) => ElementKind::Edge,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GraphElement::Vertex(v) => &v.label,
            GraphElement::Edge(e) => &e.label,
        }
    }

    pub fn id(&self) -> Option<&Value> {
        match self {
            GraphElement::Vertex(v) => v.id.as_ref(),
            GraphElement::Edge(e) => e.id.as_ref(),
        }
    }

    pub fn set_id(&mut self, id: Value) {
        match self {
            GraphElement::Vertex(v) => v.id = Some(id),
            GraphElement::Edge(e) => e.id = Some(id),
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            GraphElement::Vertex(v) => &v.properties,
            GraphElement::Edge(e) => &e.properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        match self {
            GraphElement::Vertex(v) => &mut v.properties,
            GraphElement::Edge(e) => &mut e.properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties().get(name)
    }

    /// 用新的属性集替换当前属性集，保留标识信息
    pub fn with_properties(mut self, properties: Properties) -> Self {
        *self.properties_mut() = properties;
        self
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            GraphElement::Edge(e) => Some(e),
            GraphElement::Vertex(_) => None,
        }
    }
}

impl From<Vertex> for GraphElement {
    fn from(v: Vertex) -> Self {
        GraphElement::Vertex(v)
    }
}

impl From<Edge> for GraphElement {
    fn from(e: Edge) -> Self {
        GraphElement::Edge(e)
    }
}

/// 元素在存储中的唯一标识
///
/// 顶点: 标签 + 主键属性值（按声明顺序）
/// 边: 标签 + 起点id + 终点id + 排序键属性值（按声明顺序）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKey {
    Vertex {
        label: String,
        primary_values: Vec<Value>,
    },
    Edge {
        label: String,
        source: Value,
        target: Value,
        sort_values: Vec<Value>,
    },
}

impl ElementKey {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementKey::Vertex { .. } => ElementKind::Vertex,
            ElementKey::Edge { .. } => ElementKind::Edge,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ElementKey::Vertex { label, .. } | ElementKey::Edge { label, .. } => label,
        }
    }

    /// 由键生成的元素id
    ///
    /// 顶点: `label:v1!v2`，边: `Ssource>label>v1!v2>>Starget`。
    /// 各段中的分隔符与转义符前加 `` ` ``，不同的键不会得到相同的id
    pub fn element_id(&self) -> Value {
        Value::String(self.to_string())
    }

    fn join_values(values: &[Value], delimiters: &[char]) -> String {
        values
            .iter()
            .map(|v| escape(&v.to_string(), delimiters))
            .collect::<Vec<_>>()
            .join("!")
    }

    // 字符串id以 S 开头，整数id以 L 开头
    fn endpoint(id: &Value) -> String {
        match id {
            Value::String(s) => format!("S{}", escape(s, EDGE_DELIMITERS)),
            Value::Int(i) => format!("L{}", i),
            other => format!("V{}", escape(&other.to_string(), EDGE_DELIMITERS)),
        }
    }
}

const ESCAPE: char = '`';
const VERTEX_DELIMITERS: &[char] = &[':', '!'];
const EDGE_DELIMITERS: &[char] = &['>', '!'];

fn escape(text: &str, delimiters: &[char]) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ESCAPE || delimiters.contains(&c) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Vertex {
                label,
                primary_values,
            } => write!(
                f,
                "{}:{}",
                escape(label, VERTEX_DELIMITERS),
                Self::join_values(primary_values, VERTEX_DELIMITERS)
            ),
            ElementKey::Edge {
                label,
                source,
                target,
                sort_values,
            } => write!(
                f,
                "{}>{}>{}>>{}",
                Self::endpoint(source),
                escape(label, EDGE_DELIMITERS),
                Self::join_values(sort_values, EDGE_DELIMITERS),
                Self::endpoint(target)
            ),
        }
    }
}
