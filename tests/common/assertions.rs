//! 自定义断言辅助模块

use graphmerge::core::{GraphElement, Value};

use super::BATCH_SIZE;

fn index_of(element: &GraphElement) -> String {
    element
        .property("name")
        .and_then(Value::as_str)
        .expect("元素应有 name 属性")
        .to_string()
}

/// 断言每个元素的数值属性等于 result * 序号
pub fn assert_batch_number(elements: &[GraphElement], property: &str, result: i64) {
    assert_eq!(elements.len(), BATCH_SIZE, "元素数量不匹配");
    for element in elements {
        let index: i64 = index_of(element).parse().expect("name 应为数字");
        let value = element.property(property).expect("属性缺失");
        assert_eq!(
            value,
            &Value::Int(result * index),
            "元素 {} 的属性 {} 不匹配",
            index,
            property
        );
    }
}

/// 断言每个元素的集合属性依次为 `data[k] + 序号`
pub fn assert_batch_strings(elements: &[GraphElement], property: &str, data: &[&str]) {
    assert_eq!(elements.len(), BATCH_SIZE, "元素数量不匹配");
    for element in elements {
        let index = index_of(element);
        let value = element.property(property).expect("属性缺失");
        let items = value.collection_items().expect("属性应为集合或列表");
        let actual: Vec<String> = items.iter().map(|v| v.to_string()).collect();
        let expected: Vec<String> = data.iter().map(|d| format!("{}{}", d, index)).collect();
        assert_eq!(actual, expected, "元素 {} 的属性 {} 不匹配", index, property);
    }
}

/// 断言结果失败并匹配错误
pub fn assert_err_matches<T: std::fmt::Debug, E: std::fmt::Debug>(
    result: Result<T, E>,
    predicate: impl FnOnce(&E) -> bool,
) {
    let err = result.expect_err("操作应该失败");
    assert!(predicate(&err), "错误类型不符合预期: {:?}", err);
}
