use super::types::Value;

impl Value {
    /// 数值加法运算
    ///
    /// 整数相加使用溢出检查；整数与浮点混合运算时提升为浮点
    pub fn checked_add(&self, other: &Value) -> Result<Value, String> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a
                .checked_add(*b)
                .map(Int)
                .ok_or_else(|| format!("整数加法溢出: {} + {}", a, b)),
            (Float(a), Float(b)) => Ok(Float(a + b)),
            (Int(a), Float(b)) => Ok(Float(*a as f64 + b)),
            (Float(a), Int(b)) => Ok(Float(a + *b as f64)),
            _ => Err("无法对这些类型的值进行加法运算".to_string()),
        }
    }
}
