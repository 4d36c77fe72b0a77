use super::types::Value;
use std::cmp::Ordering as CmpOrdering;
use std::hash::{Hash, Hasher};

// 手动实现PartialEq以正确处理f64比较
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::cmp_f64(*a, *b) == CmpOrdering::Equal,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            _ => false,
        }
    }
}

// 手动实现Eq，因为f64没有实现Eq
impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        match (self, other) {
            (Value::Null, Value::Null) => CmpOrdering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => Self::cmp_f64(*a, *b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),

            // 不同类型之间的比较：基于类型优先级
            (a, b) => Self::type_priority(a).cmp(&Self::type_priority(b)),
        }
    }
}

// 手动实现Hash以处理f64哈希
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::type_priority(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => {
                if f.is_nan() {
                    // 所有NaN值应该哈希到相同的值
                    (0x7ff8_0000_0000_0000u64).hash(state);
                } else if *f == 0.0 {
                    // 确保+0.0和-0.0哈希到相同的值
                    0.0_f64.to_bits().hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::List(items) => items.hash(state),
            Value::Set(items) => {
                for item in items {
                    item.hash(state);
                }
            }
        }
    }
}

impl Value {
    // 浮点数比较辅助函数，NaN 小于任何非NaN值，+0.0 与 -0.0 相等
    fn cmp_f64(a: f64, b: f64) -> CmpOrdering {
        if a.is_nan() && b.is_nan() {
            CmpOrdering::Equal
        } else if a.is_nan() {
            CmpOrdering::Less
        } else if b.is_nan() {
            CmpOrdering::Greater
        } else {
            a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal)
        }
    }

    // 类型优先级：Null < Bool < Int < Float < String < Date < List < Set
    fn type_priority(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::String(_) => 4,
            Value::Date(_) => 5,
            Value::List(_) => 6,
            Value::Set(_) => 7,
        }
    }

    /// 按自然顺序比较两个值
    ///
    /// 与 `Ord` 不同，整数与浮点数按数值比较；形态不同的值无法比较，返回 None
    pub fn natural_cmp(&self, other: &Value) -> Option<CmpOrdering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_float()?, b.as_float()?);
                Some(Self::cmp_f64(x, y))
            }
            _ => None,
        }
    }
}
