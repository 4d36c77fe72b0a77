//! 测试数据生成模块
//!
//! 第 i 个元素（从 1 开始）: name = "i"，price = symbol * i（symbol 为整数时），
//! set = {"<symbol>i"}，list = ["<symbol>i"]

use chrono::{Duration, Local};
use graphmerge::core::{Edge, Value, Vertex};

fn symbol_text(symbol: &Value) -> String {
    match symbol {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fill<F>(symbol: &Value, i: usize, mut set_property: F)
where
    F: FnMut(&str, Value),
{
    let i64_index = i as i64;
    set_property("name", Value::from(i.to_string()));
    if let Value::Int(n) = symbol {
        set_property("price", Value::Int(n * i64_index));
    }
    let date = Local::now().naive_local() + Duration::milliseconds(i64_index);
    set_property("date", Value::Date(date));
    let item = format!("{}{}", symbol_text(symbol), i);
    set_property("set", Value::string_set([item.clone()]));
    set_property("list", Value::string_list([item]));
}

/// 创建 num 个顶点
pub fn create_n_vertex_batch(label: &str, symbol: impl Into<Value>, num: usize) -> Vec<Vertex> {
    let symbol = symbol.into();
    (1..=num)
        .map(|i| {
            let mut vertex = Vertex::new(label);
            fill(&symbol, i, |name, value| vertex.set_property(name, value));
            vertex
        })
        .collect()
}

/// 创建 num 条边，第 i 条从 `label:i` 指向 `label:2i`
pub fn create_n_edge_batch(
    vertex_label: &str,
    edge_label: &str,
    symbol: impl Into<Value>,
    num: usize,
) -> Vec<Edge> {
    let symbol = symbol.into();
    (1..=num)
        .map(|i| {
            let mut edge = Edge::new(
                edge_label,
                format!("{}:{}", vertex_label, i),
                format!("{}:{}", vertex_label, i * 2),
            )
            .with_endpoint_labels(vertex_label, vertex_label);
            fill(&symbol, i, |name, value| edge.set_property(name, value));
            edge
        })
        .collect()
}

/// 单个带价格的顶点
pub fn object(name: &str, price: i64) -> Vertex {
    Vertex::new("object")
        .with_property("name", name)
        .with_property("price", price)
}

/// 复合主键顶点
pub fn person(name: &str, city: &str, price: i64) -> Vertex {
    Vertex::new("person")
        .with_property("name", name)
        .with_property("city", city)
        .with_property("price", price)
}

/// 以 seq 区分的 `object:source` 到 `object:target` 的边
pub fn transfer(source: usize, target: usize, seq: i64, price: i64) -> Edge {
    Edge::new(
        "transfers",
        format!("object:{}", source),
        format!("object:{}", target),
    )
    .with_endpoint_labels("object", "object")
    .with_property("seq", seq)
    .with_property("price", price)
}
