//! 批量属性合并集成测试
//!
//! 测试范围:
//! - 顶点/边的各更新策略
//! - 无效请求
//! - 原子性与同批次重复键
//! - 复合主键与排序键
//! - 并发批次

mod common;

use common::{
    assertions::{assert_batch_number, assert_batch_strings, assert_err_matches},
    data_fixtures::{create_n_edge_batch, create_n_vertex_batch, object, person, transfer},
    TestContext, BATCH_SIZE,
};

use graphmerge::config::Config;
use graphmerge::core::error::{BatchError, SchemaError, StorageError, ValidationErrorType};
use graphmerge::core::{BatchRequest, GraphElement, UpdateStrategy, Value, ValueShape, Vertex};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn batch_vertex_request(
    ctx: &TestContext,
    key: &str,
    old: impl Into<Value>,
    new: impl Into<Value>,
    strategy: UpdateStrategy,
) -> BatchRequest {
    ctx.add_elements(create_n_vertex_batch("object", old, BATCH_SIZE));
    BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", new, BATCH_SIZE))
        .strategy(key, strategy)
        .create_if_not_exist(true)
        .build()
}

fn batch_edge_request(
    ctx: &TestContext,
    key: &str,
    old: impl Into<Value>,
    new: impl Into<Value>,
    strategy: UpdateStrategy,
) -> BatchRequest {
    let old = old.into();
    ctx.add_elements(create_n_vertex_batch("object", old.clone(), BATCH_SIZE * 2));
    ctx.add_elements(create_n_edge_batch("object", "updates", old, BATCH_SIZE));
    BatchRequest::builder()
        .edges(create_n_edge_batch("object", "updates", new, BATCH_SIZE))
        .strategy(key, strategy)
        .check_vertex(false)
        .create_if_not_exist(true)
        .build()
}

fn execute(ctx: &TestContext, request: BatchRequest) -> Vec<GraphElement> {
    ctx.processor.execute(request).expect("批量更新应该成功")
}

// ==================== 顶点策略测试 ====================

#[test]
fn test_vertex_batch_update_strategy_sum() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "price", 1, -1, UpdateStrategy::Sum);
    assert_batch_number(&execute(&ctx, req), "price", 0);

    let req = batch_vertex_request(&ctx, "price", 2, 3, UpdateStrategy::Sum);
    assert_batch_number(&execute(&ctx, req), "price", 5);
}

#[test]
fn test_vertex_batch_update_strategy_bigger() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "price", -3, 1, UpdateStrategy::Bigger);
    assert_batch_number(&execute(&ctx, req), "price", 1);

    let req = batch_vertex_request(&ctx, "price", 7, 3, UpdateStrategy::Bigger);
    assert_batch_number(&execute(&ctx, req), "price", 7);
}

#[test]
fn test_vertex_batch_update_strategy_smaller() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "price", -3, 1, UpdateStrategy::Smaller);
    assert_batch_number(&execute(&ctx, req), "price", -3);

    let req = batch_vertex_request(&ctx, "price", 7, 3, UpdateStrategy::Smaller);
    assert_batch_number(&execute(&ctx, req), "price", 3);
}

#[test]
fn test_vertex_batch_update_strategy_union() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "set", "old", "new", UpdateStrategy::Union);
    assert_batch_strings(&execute(&ctx, req), "set", &["new", "old"]);

    let req = batch_vertex_request(&ctx, "set", "old", "old", UpdateStrategy::Union);
    assert_batch_strings(&execute(&ctx, req), "set", &["old"]);
}

#[test]
fn test_vertex_batch_update_strategy_intersection() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "set", "old", "new", UpdateStrategy::Intersection);
    assert_batch_strings(&execute(&ctx, req), "set", &[]);

    let req = batch_vertex_request(&ctx, "set", "old", "old", UpdateStrategy::Intersection);
    assert_batch_strings(&execute(&ctx, req), "set", &["old"]);
}

#[test]
fn test_vertex_batch_update_strategy_append() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "list", "old", "old", UpdateStrategy::Append);
    assert_batch_strings(&execute(&ctx, req), "list", &["old", "old"]);

    let req = batch_vertex_request(&ctx, "list", "old", "new", UpdateStrategy::Append);
    assert_batch_strings(&execute(&ctx, req), "list", &["old", "new"]);
}

#[test]
fn test_vertex_batch_update_strategy_eliminate() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "list", "old", "old", UpdateStrategy::Eliminate);
    assert_batch_strings(&execute(&ctx, req), "list", &[]);

    let req = batch_vertex_request(&ctx, "list", "old", "x", UpdateStrategy::Eliminate);
    assert_batch_strings(&execute(&ctx, req), "list", &["old"]);
}

#[test]
fn test_vertex_empty_update_strategy() {
    let ctx = TestContext::new();
    let req = batch_vertex_request(&ctx, "set", "old", "old", UpdateStrategy::Union);
    let writes = ctx.stats().total_writes;

    let mut with_null = req.clone();
    if let Some(elements) = with_null.elements.as_mut() {
        elements[1] = None;
    }
    let mut without_elements = req.clone();
    without_elements.elements = None;
    let mut empty_elements = req.clone();
    empty_elements.elements = Some(Vec::new());
    let mut without_strategies = req.clone();
    without_strategies.strategies = None;
    let mut empty_strategies = req.clone();
    empty_strategies.strategies = Some(HashMap::new());

    for (request, expected) in [
        (with_null, ValidationErrorType::NullElement { index: 1 }),
        (without_elements, ValidationErrorType::MissingElements),
        (empty_elements, ValidationErrorType::EmptyElements),
        (without_strategies, ValidationErrorType::MissingStrategies),
        (empty_strategies, ValidationErrorType::EmptyStrategies),
    ] {
        assert_err_matches(ctx.processor.execute(request), |e| {
            matches!(e, BatchError::InvalidBatch(v) if v.error_type == expected)
        });
    }
    assert_eq!(ctx.stats().total_writes, writes, "无效请求不应写入");
}

// ==================== 边策略测试 ====================

#[test]
fn test_edge_batch_update_strategy_sum() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "price", -1, 1, UpdateStrategy::Sum);
    assert_batch_number(&execute(&ctx, req), "price", 0);

    let req = batch_edge_request(&ctx, "price", 2, 3, UpdateStrategy::Sum);
    assert_batch_number(&execute(&ctx, req), "price", 5);
}

#[test]
fn test_edge_batch_update_strategy_bigger() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "price", -3, 1, UpdateStrategy::Bigger);
    assert_batch_number(&execute(&ctx, req), "price", 1);

    let req = batch_edge_request(&ctx, "price", 7, 3, UpdateStrategy::Bigger);
    assert_batch_number(&execute(&ctx, req), "price", 7);
}

#[test]
fn test_edge_batch_update_strategy_smaller() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "price", -3, 1, UpdateStrategy::Smaller);
    assert_batch_number(&execute(&ctx, req), "price", -3);

    let req = batch_edge_request(&ctx, "price", 7, 3, UpdateStrategy::Smaller);
    assert_batch_number(&execute(&ctx, req), "price", 3);
}

#[test]
fn test_edge_batch_update_strategy_union() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "set", "old", "new", UpdateStrategy::Union);
    assert_batch_strings(&execute(&ctx, req), "set", &["new", "old"]);

    let req = batch_edge_request(&ctx, "set", "old", "old", UpdateStrategy::Union);
    assert_batch_strings(&execute(&ctx, req), "set", &["old"]);
}

#[test]
fn test_edge_batch_update_strategy_intersection() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "set", "old", "new", UpdateStrategy::Intersection);
    assert_batch_strings(&execute(&ctx, req), "set", &[]);

    let req = batch_edge_request(&ctx, "set", "old", "old", UpdateStrategy::Intersection);
    assert_batch_strings(&execute(&ctx, req), "set", &["old"]);
}

#[test]
fn test_edge_batch_update_strategy_append() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "list", "old", "old", UpdateStrategy::Append);
    assert_batch_strings(&execute(&ctx, req), "list", &["old", "old"]);

    let req = batch_edge_request(&ctx, "list", "old", "new", UpdateStrategy::Append);
    assert_batch_strings(&execute(&ctx, req), "list", &["old", "new"]);
}

#[test]
fn test_edge_batch_update_strategy_eliminate() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "list", "old", "old", UpdateStrategy::Eliminate);
    assert_batch_strings(&execute(&ctx, req), "list", &[]);

    let req = batch_edge_request(&ctx, "list", "old", "new", UpdateStrategy::Eliminate);
    assert_batch_strings(&execute(&ctx, req), "list", &["old"]);
}

#[test]
fn test_edge_empty_update_strategy() {
    let ctx = TestContext::new();
    let req = batch_edge_request(&ctx, "list", "old", "old", UpdateStrategy::Eliminate);
    let writes = ctx.stats().total_writes;

    let mut with_null = req.clone();
    if let Some(elements) = with_null.elements.as_mut() {
        elements[1] = None;
    }
    let mut empty_strategies = req;
    empty_strategies.strategies = Some(HashMap::new());

    for request in [with_null, empty_strategies] {
        assert_err_matches(ctx.processor.execute(request), |e| {
            matches!(e, BatchError::InvalidBatch(_))
        });
    }
    assert_eq!(ctx.stats().total_writes, writes, "无效请求不应写入");
}

#[test]
fn test_edge_check_vertex() {
    let ctx = TestContext::new();
    // 只有 object:1..object:5，第 3 条边指向 object:6
    ctx.add_elements(create_n_vertex_batch("object", 1, BATCH_SIZE));
    let request = BatchRequest::builder()
        .edges(create_n_edge_batch("object", "updates", 1, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .check_vertex(true)
        .create_if_not_exist(true)
        .build();
    let writes = ctx.stats().total_writes;

    assert_err_matches(ctx.processor.execute(request.clone()), |e| {
        matches!(e, BatchError::VertexNotFound { index: 2, id } if *id == Value::from("object:6"))
    });
    assert_eq!(ctx.stats().total_writes, writes);

    ctx.add_elements(create_n_vertex_batch("object", 1, BATCH_SIZE * 2));
    let created = execute(&ctx, request);
    assert_eq!(created.len(), BATCH_SIZE);
    assert_eq!(ctx.stats().total_edges, BATCH_SIZE);
}

// ==================== 批次语义测试 ====================

#[test]
fn test_repeated_sum_against_existing() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", -1, BATCH_SIZE));

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 2, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    assert_batch_number(&execute(&ctx, req), "price", 1);

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 3, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    assert_batch_number(&execute(&ctx, req), "price", 4);
}

#[test]
fn test_repeated_union_is_stable() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", "old", BATCH_SIZE));
    for _ in 0..2 {
        let req = BatchRequest::builder()
            .vertices(create_n_vertex_batch("object", "new", BATCH_SIZE))
            .strategy("set", UpdateStrategy::Union)
            .create_if_not_exist(true)
            .build();
        assert_batch_strings(&execute(&ctx, req), "set", &["new", "old"]);
    }
    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", "old", BATCH_SIZE))
        .strategy("set", UpdateStrategy::Union)
        .build();
    assert_batch_strings(&execute(&ctx, req), "set", &["new", "old"]);
}

#[test]
fn test_missing_element_rejects_whole_batch() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", 1, BATCH_SIZE - 1));
    let writes = ctx.stats().total_writes;

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 10, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(false)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(e, BatchError::ElementNotFound { index, .. } if *index == BATCH_SIZE - 1)
    });

    assert_eq!(ctx.stats().total_writes, writes, "被拒绝的批次不应写入");
    for (i, vertex) in create_n_vertex_batch("object", 1, BATCH_SIZE - 1)
        .into_iter()
        .enumerate()
    {
        let stored = ctx.find(vertex).expect("顶点应存在");
        assert_eq!(stored.property("price"), Some(&Value::Int(i as i64 + 1)));
    }
    assert!(ctx.find(object(&BATCH_SIZE.to_string(), 0)).is_none());
}

#[test]
fn test_update_without_create_when_all_exist() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", 1, BATCH_SIZE));
    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 1, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(false)
        .build();
    let outcome = ctx.processor.execute_with_outcome(req).expect("批量更新应该成功");
    assert_eq!(outcome.created, 0);
    assert_eq!(outcome.updated, BATCH_SIZE);
    assert_batch_number(&outcome.elements, "price", 2);
}

#[test]
fn test_repeated_key_in_one_batch() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 1)]);
    let req = BatchRequest::builder()
        .vertices(vec![object("1", 2), object("1", 3)])
        .strategy("price", UpdateStrategy::Sum)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(results[0].property("price"), Some(&Value::Int(3)));
    assert_eq!(results[1].property("price"), Some(&Value::Int(6)));
    let stored = ctx.find(object("1", 0)).expect("顶点应存在");
    assert_eq!(stored.property("price"), Some(&Value::Int(6)));
}

#[test]
fn test_repeated_new_key_created_then_merged() {
    let ctx = TestContext::new();
    let req = BatchRequest::builder()
        .vertices(vec![object("7", 2), object("7", 3)])
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    let outcome = ctx.processor.execute_with_outcome(req).expect("批量更新应该成功");
    assert_eq!((outcome.created, outcome.updated), (1, 1));
    assert_eq!(outcome.elements[1].property("price"), Some(&Value::Int(5)));
    assert_eq!(ctx.stats().total_vertices, 1);
}

#[test]
fn test_created_elements_get_ids_and_keep_order() {
    let ctx = TestContext::new();
    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 1, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    let results = execute(&ctx, req);
    let ids: Vec<String> = results
        .iter()
        .map(|e| e.id().expect("应分配id").to_string())
        .collect();
    assert_eq!(ids, vec!["object:1", "object:2", "object:3", "object:4", "object:5"]);
}

#[test]
fn test_key_property_never_merged() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 1)]);
    let req = BatchRequest::builder()
        .vertices(vec![object("1", 1)])
        .strategy("name", UpdateStrategy::Union)
        .strategy("price", UpdateStrategy::Sum)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(results[0].property("name"), Some(&Value::from("1")));
    assert_eq!(results[0].property("price"), Some(&Value::Int(2)));
}

#[test]
fn test_properties_without_strategy_are_overwritten_or_kept() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 1).with_property("list", Value::string_list(["a"]))]);
    let req = BatchRequest::builder()
        .vertices(vec![object("1", 9)])
        .strategy("list", UpdateStrategy::Append)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(results[0].property("price"), Some(&Value::Int(9)));
    assert_eq!(results[0].property("list"), Some(&Value::string_list(["a"])));
}

#[test]
fn test_incompatible_strategy_rejects_batch() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", "old", BATCH_SIZE));
    let writes = ctx.stats().total_writes;

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", "new", BATCH_SIZE))
        .strategy("set", UpdateStrategy::Sum)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(
            e,
            BatchError::IncompatibleStrategy { index: 0, property, strategy: UpdateStrategy::Sum, shape: ValueShape::Set }
                if property == "set"
        )
    });

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", "new", BATCH_SIZE))
        .strategy("date", UpdateStrategy::Sum)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(e, BatchError::IncompatibleStrategy { shape: ValueShape::Temporal, .. })
    });
    assert_eq!(ctx.stats().total_writes, writes);
}

#[test]
fn test_smaller_on_dates() {
    let ctx = TestContext::new();
    ctx.add_elements(create_n_vertex_batch("object", 1, BATCH_SIZE));
    let before = ctx.find(object("1", 0)).expect("顶点应存在");
    let earlier = before.property("date").cloned().expect("应有日期");

    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 1, BATCH_SIZE))
        .strategy("date", UpdateStrategy::Smaller)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(results[0].property("date"), Some(&earlier));
}

#[test]
fn test_sum_overflow() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", i64::MAX)]);
    let req = BatchRequest::builder()
        .vertices(vec![object("1", 1)])
        .strategy("price", UpdateStrategy::Sum)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(e, BatchError::Overflow { index: 0, .. })
    });
}

#[test]
fn test_invalid_element_rejects_batch() {
    let ctx = TestContext::new();
    let unknown: GraphElement = Vertex::new("animal")
        .with_property("name", "1")
        .into();
    let req = BatchRequest::builder()
        .elements(vec![object("1", 1).into(), unknown])
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(e, BatchError::InvalidElement { index: 1, .. })
    });
    assert_eq!(ctx.stats().total_writes, 0);
}

#[test]
fn test_batch_size_limit_from_config() {
    let mut config = Config::default();
    config.batch.max_elements = BATCH_SIZE - 1;
    let ctx = TestContext::with_config(&config);
    let req = BatchRequest::builder()
        .vertices(create_n_vertex_batch("object", 1, BATCH_SIZE))
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(e, BatchError::InvalidBatch(v) if v.error_type == ValidationErrorType::TooManyElements)
    });
}

// ==================== 键测试 ====================

fn ids(results: &[GraphElement]) -> Vec<String> {
    results
        .iter()
        .map(|e| e.id().expect("应分配id").to_string())
        .collect()
}

#[test]
fn test_composite_key_vertex_merge() {
    let ctx = TestContext::new();
    ctx.add_elements([person("a", "x", 1), person("a", "y", 10)]);
    let req = BatchRequest::builder()
        .vertices(vec![person("a", "x", 2)])
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(false)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(ids(&results), vec!["person:a!x"]);
    assert_eq!(results[0].property("price"), Some(&Value::Int(3)));

    let untouched = ctx.find(person("a", "y", 0)).expect("顶点应存在");
    assert_eq!(untouched.property("price"), Some(&Value::Int(10)));
    assert_eq!(ctx.stats().total_vertices, 2);
}

#[test]
fn test_composite_key_values_with_delimiters_stay_distinct() {
    let ctx = TestContext::new();
    let req = BatchRequest::builder()
        .vertices(vec![person("x!y", "z", 1), person("x", "y!z", 2)])
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(ids(&results), vec!["person:x`!y!z", "person:x!y`!z"]);

    let stats = ctx.stats();
    assert_eq!(stats.total_vertices, 2);
    assert_eq!(stats.total_edges, 0);
    assert_eq!(
        ctx.find(person("x!y", "z", 0)).and_then(|v| v.property("price").cloned()),
        Some(Value::Int(1))
    );
    assert_eq!(
        ctx.find(person("x", "y!z", 0)).and_then(|v| v.property("price").cloned()),
        Some(Value::Int(2))
    );
}

#[test]
fn test_key_value_of_wrong_type_rejected() {
    let ctx = TestContext::new();
    let req = BatchRequest::builder()
        .vertices(vec![Vertex::new("object").with_property("name", 1i64)])
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(true)
        .build();
    assert_err_matches(ctx.processor.execute(req), |e| {
        matches!(
            e,
            BatchError::InvalidElement {
                index: 0,
                source: SchemaError::KeyTypeMismatch { .. }
            }
        )
    });
    assert_eq!(ctx.stats().total_writes, 0);
}

#[test]
fn test_sort_key_separates_parallel_edges() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 0), object("2", 0)]);
    ctx.add_elements([transfer(1, 2, 1, 5), transfer(1, 2, 2, 7)]);
    assert_eq!(ctx.stats().total_edges, 2);

    let req = BatchRequest::builder()
        .edges(vec![transfer(1, 2, 1, 1), transfer(1, 2, 2, 2)])
        .strategy("price", UpdateStrategy::Sum)
        .check_vertex(true)
        .create_if_not_exist(false)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(
        ids(&results),
        vec!["Sobject:1>transfers>1>>Sobject:2", "Sobject:1>transfers>2>>Sobject:2"]
    );
    assert_eq!(results[0].property("price"), Some(&Value::Int(6)));
    assert_eq!(results[1].property("price"), Some(&Value::Int(9)));

    assert_eq!(
        ctx.find(transfer(1, 2, 1, 0)).and_then(|e| e.property("price").cloned()),
        Some(Value::Int(6))
    );
    assert_eq!(
        ctx.find(transfer(1, 2, 2, 0)).and_then(|e| e.property("price").cloned()),
        Some(Value::Int(9))
    );
    assert_eq!(ctx.stats().total_edges, 2);
}

#[test]
fn test_sort_key_never_merged() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 0), object("2", 0)]);
    ctx.add_elements([transfer(1, 2, 3, 5)]);
    let req = BatchRequest::builder()
        .edges(vec![transfer(1, 2, 3, 4)])
        .strategy("seq", UpdateStrategy::Sum)
        .strategy("price", UpdateStrategy::Sum)
        .create_if_not_exist(false)
        .build();
    let results = execute(&ctx, req);
    assert_eq!(results[0].property("seq"), Some(&Value::Int(3)));
    assert_eq!(results[0].property("price"), Some(&Value::Int(9)));

    let stored = ctx.find(transfer(1, 2, 3, 0)).expect("边应存在");
    assert_eq!(stored.property("seq"), Some(&Value::Int(3)));
    assert_eq!(ctx.stats().total_edges, 1);
}

// ==================== 并发测试 ====================

#[test]
fn test_concurrent_sum_on_same_key() {
    let ctx = TestContext::new();
    ctx.add_elements([object("1", 0)]);
    let processor = Arc::new(ctx.processor.clone());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                for _ in 0..50 {
                    let req = BatchRequest::builder()
                        .vertices(vec![object("1", 1)])
                        .strategy("price", UpdateStrategy::Sum)
                        .build();
                    processor.execute(req).expect("批量更新应该成功");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("线程异常");
    }

    let stored = ctx.find(object("1", 0)).expect("顶点应存在");
    assert_eq!(stored.property("price"), Some(&Value::Int(100)));
}

#[test]
fn test_concurrent_batches_on_disjoint_keys() {
    let ctx = TestContext::new();
    let processor = Arc::new(ctx.processor.clone());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                let req = BatchRequest::builder()
                    .vertices(vec![object(&format!("t{}", t), t)])
                    .strategy("price", UpdateStrategy::Sum)
                    .create_if_not_exist(true)
                    .build();
                processor.execute(req).expect("批量更新应该成功")
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("线程异常").len(), 1);
    }
    assert_eq!(ctx.stats().total_vertices, 4);
}

#[test]
fn test_lock_timeout_when_key_held() {
    let mut config = Config::default();
    config.lock.wait_timeout_ms = 30;
    let ctx = TestContext::with_config(&config);
    ctx.add_elements([object("1", 1)]);

    let key = ctx.key_of(&object("1", 0).into());
    let _held = ctx
        .processor
        .lock_manager()
        .lock_batch(vec![key])
        .expect("加锁失败");

    let req = BatchRequest::builder()
        .vertices(vec![object("1", 1)])
        .strategy("price", UpdateStrategy::Sum)
        .build();
    let err = ctx.processor.execute(req).expect_err("应当等锁超时");
    assert!(matches!(err, BatchError::Storage(StorageError::LockTimeout(_))));
    assert!(err.is_retryable());
}
