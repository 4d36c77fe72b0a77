//! 批量更新请求

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::graph_element::{Edge, GraphElement, Vertex};
use crate::core::update_strategy::UpdateStrategy;

/// 批量更新请求
///
/// `elements` 与 `strategies` 可能缺失，由验证器在执行前检查
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub elements: Option<Vec<Option<GraphElement>>>,
    #[serde(default, rename = "update_strategies")]
    pub strategies: Option<HashMap<String, UpdateStrategy>>,
    #[serde(default)]
    pub create_if_not_exist: bool,
    /// 仅对边批次生效：要求边的端点顶点已存在
    #[serde(default)]
    pub check_vertex: bool,
}

impl BatchRequest {
    pub fn builder() -> BatchRequestBuilder {
        BatchRequestBuilder::default()
    }

    /// 元素个数，缺失时为 0
    pub fn len(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchRequestBuilder {
    elements: Option<Vec<Option<GraphElement>>>,
    strategies: Option<HashMap<String, UpdateStrategy>>,
    create_if_not_exist: bool,
    check_vertex: bool,
}

impl BatchRequestBuilder {
    pub fn elements<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = GraphElement>,
    {
        self.elements = Some(elements.into_iter().map(Some).collect());
        self
    }

    /// 直接设置可能包含空元素的列表
    pub fn raw_elements(mut self, elements: Option<Vec<Option<GraphElement>>>) -> Self {
        self.elements = elements;
        self
    }

    pub fn vertices<I>(self, vertices: I) -> Self
    where
        I: IntoIterator<Item = Vertex>,
    {
        self.elements(vertices.into_iter().map(GraphElement::Vertex))
    }

    pub fn edges<I>(self, edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        self.elements(edges.into_iter().map(GraphElement::Edge))
    }

    pub fn strategies(mut self, strategies: HashMap<String, UpdateStrategy>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    pub fn strategy(mut self, property: impl Into<String>, strategy: UpdateStrategy) -> Self {
        self.strategies
            .get_or_insert_with(HashMap::new)
            .insert(property.into(), strategy);
        self
    }

    pub fn create_if_not_exist(mut self, create: bool) -> Self {
        self.create_if_not_exist = create;
        self
    }

    pub fn check_vertex(mut self, check: bool) -> Self {
        self.check_vertex = check;
        self
    }

    pub fn build(self) -> BatchRequest {
        BatchRequest {
            elements: self.elements,
            strategies: self.strategies,
            create_if_not_exist: self.create_if_not_exist,
            check_vertex: self.check_vertex,
        }
    }
}
