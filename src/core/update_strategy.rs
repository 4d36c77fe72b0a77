//! 属性更新策略
//!
//! 批量更新时，已存在元素的属性值与新元素的属性值按策略合并：
//! - 数值策略: SUM / BIGGER / SMALLER
//! - 集合策略: UNION / INTERSECTION / APPEND / ELIMINATE
//!
//! 合并是纯函数，不访问存储

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::value::{Value, ValueShape};

/// 属性更新策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStrategy {
    /// 数值相加
    Sum,
    /// 取较大值（数值或时间）
    Bigger,
    /// 取较小值（数值或时间）
    Smaller,
    /// 并集
    Union,
    /// 交集
    Intersection,
    /// 追加到末尾，保留重复
    Append,
    /// 按出现次数逐个移除
    Eliminate,
}

/// 合并错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("策略 {strategy} 不适用于 {shape} 类型的值")]
    Incompatible {
        strategy: UpdateStrategy,
        shape: ValueShape,
    },
    #[error("策略 {strategy} 计算溢出: {detail}")]
    Overflow {
        strategy: UpdateStrategy,
        detail: String,
    },
}

impl UpdateStrategy {
    pub const ALL: [UpdateStrategy; 7] = [
        UpdateStrategy::Sum,
        UpdateStrategy::Bigger,
        UpdateStrategy::Smaller,
        UpdateStrategy::Union,
        UpdateStrategy::Intersection,
        UpdateStrategy::Append,
        UpdateStrategy::Eliminate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStrategy::Sum => "SUM",
            UpdateStrategy::Bigger => "BIGGER",
            UpdateStrategy::Smaller => "SMALLER",
            UpdateStrategy::Union => "UNION",
            UpdateStrategy::Intersection => "INTERSECTION",
            UpdateStrategy::Append => "APPEND",
            UpdateStrategy::Eliminate => "ELIMINATE",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            UpdateStrategy::Sum | UpdateStrategy::Bigger | UpdateStrategy::Smaller
        )
    }

    pub fn is_collection(&self) -> bool {
        !self.is_numeric()
    }

    /// 策略是否适用于给定形态的值
    ///
    /// Null 表示值缺失，任何策略都接受
    pub fn accepts(&self, shape: ValueShape) -> bool {
        match (self, shape) {
            (_, ValueShape::Null) => true,
            (UpdateStrategy::Sum, ValueShape::Numeric) => true,
            (UpdateStrategy::Bigger | UpdateStrategy::Smaller, ValueShape::Numeric) => true,
            (UpdateStrategy::Bigger | UpdateStrategy::Smaller, ValueShape::Temporal) => true,
            (s, ValueShape::Set | ValueShape::List) => s.is_collection(),
            _ => false,
        }
    }

    /// 合并已存在的值与新值
    ///
    /// `existing` 为 None（或 Null）时直接返回新值；新值为 Null 时保留已存在的值
    pub fn merge(&self, existing: Option<&Value>, incoming: &Value) -> Result<Value, MergeError> {
        let existing = match existing {
            Some(v) if !v.is_null() => v,
            _ => return Ok(incoming.clone()),
        };
        if incoming.is_null() {
            return Ok(existing.clone());
        }

        for value in [existing, incoming] {
            if !self.accepts(value.shape()) {
                return Err(self.incompatible(value.shape()));
            }
        }

        match self {
            UpdateStrategy::Sum => existing
                .checked_add(incoming)
                .map_err(|detail| MergeError::Overflow {
                    strategy: *self,
                    detail,
                }),
            UpdateStrategy::Bigger => self.pick(existing, incoming, Ordering::Greater),
            UpdateStrategy::Smaller => self.pick(existing, incoming, Ordering::Less),
            UpdateStrategy::Union => Ok(Self::union(existing, incoming)),
            UpdateStrategy::Intersection => Ok(Self::intersection(existing, incoming)),
            UpdateStrategy::Append => Ok(Self::append(existing, incoming)),
            UpdateStrategy::Eliminate => Ok(Self::eliminate(existing, incoming)),
        }
    }

    fn incompatible(&self, shape: ValueShape) -> MergeError {
        MergeError::Incompatible {
            strategy: *self,
            shape,
        }
    }

    // 新值相对已存在值的顺序等于 wanted 时取新值，相等时保留已存在的值
    fn pick(&self, existing: &Value, incoming: &Value, wanted: Ordering) -> Result<Value, MergeError> {
        let ordering = incoming
            .natural_cmp(existing)
            .ok_or_else(|| self.incompatible(incoming.shape()))?;
        if ordering == wanted {
            Ok(incoming.clone())
        } else {
            Ok(existing.clone())
        }
    }

    fn items(value: &Value) -> Vec<Value> {
        match value {
            Value::List(items) => items.clone(),
            Value::Set(items) => items.iter().cloned().collect(),
            other => vec![other.clone()],
        }
    }

    fn union(existing: &Value, incoming: &Value) -> Value {
        match existing {
            Value::Set(items) => {
                let mut merged = items.clone();
                merged.extend(Self::items(incoming));
                Value::Set(merged)
            }
            _ => {
                let mut merged = Self::items(existing);
                for item in Self::items(incoming) {
                    if !merged.contains(&item) {
                        merged.push(item);
                    }
                }
                Value::List(merged)
            }
        }
    }

    fn intersection(existing: &Value, incoming: &Value) -> Value {
        let wanted: BTreeSet<Value> = Self::items(incoming).into_iter().collect();
        match existing {
            Value::Set(items) => Value::Set(items.intersection(&wanted).cloned().collect()),
            _ => {
                let mut kept = Self::items(existing);
                kept.retain(|item| wanted.contains(item));
                Value::List(kept)
            }
        }
    }

    fn append(existing: &Value, incoming: &Value) -> Value {
        match existing {
            Value::Set(_) => Self::union(existing, incoming),
            _ => {
                let mut merged = Self::items(existing);
                merged.extend(Self::items(incoming));
                Value::List(merged)
            }
        }
    }

    fn eliminate(existing: &Value, incoming: &Value) -> Value {
        match existing {
            Value::Set(items) => {
                let removed: BTreeSet<Value> = Self::items(incoming).into_iter().collect();
                Value::Set(items.difference(&removed).cloned().collect())
            }
            _ => {
                let mut remaining = Self::items(existing);
                for item in Self::items(incoming) {
                    if let Some(pos) = remaining.iter().position(|v| *v == item) {
                        remaining.remove(pos);
                    }
                }
                Value::List(remaining)
            }
        }
    }
}

/// 按策略合并两个属性值
pub fn merge(
    strategy: UpdateStrategy,
    existing: Option<&Value>,
    incoming: &Value,
) -> Result<Value, MergeError> {
    strategy.merge(existing, incoming)
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        UpdateStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == upper)
            .ok_or_else(|| format!("未知的更新策略: {}", s))
    }
}
