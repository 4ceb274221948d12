use rowmap_core::Value;

use std::hash::{Hash, Hasher};

/// Values of a result map's group-by columns for one row.
///
/// Compared element-wise; nulls are equal to each other and floats compare
/// by bit pattern so that keys are usable in hash maps.
#[derive(Debug, Clone)]
pub(crate) struct GroupKey(Vec<Value>);

impl GroupKey {
    pub(crate) fn new(values: Vec<Value>) -> GroupKey {
        GroupKey(values)
    }

    /// Returns `true` if every component is null.
    pub(crate) fn is_null(&self) -> bool {
        self.0.iter().all(Value::is_null)
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| same(a, b))
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for value in &self.0 {
            hash_value(value, state);
        }
    }
}

fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
        (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same(a, b))
        }
        (a, b) => a == b,
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);

    match value {
        Value::Bool(v) => v.hash(state),
        Value::I8(v) => v.hash(state),
        Value::I16(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::U8(v) => v.hash(state),
        Value::U16(v) => v.hash(state),
        Value::U32(v) => v.hash(state),
        Value::U64(v) => v.hash(state),
        Value::F32(v) => v.to_bits().hash(state),
        Value::F64(v) => v.to_bits().hash(state),
        Value::Char(v) => v.hash(state),
        Value::String(v) => v.hash(state),
        Value::Bytes(v) => v.hash(state),
        Value::List(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        // Beans hash by variant only and fall back to equality.
        Value::Bean(_) | Value::Null => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn key(values: &[Value]) -> GroupKey {
        GroupKey::new(values.to_vec())
    }

    #[test]
    fn equal_keys_collide() {
        let mut groups = HashMap::new();
        groups.insert(key(&[Value::I64(1), Value::Null]), "first");

        assert_eq!(groups.get(&key(&[Value::I64(1), Value::Null])), Some(&"first"));
        assert_eq!(groups.get(&key(&[Value::I64(1), Value::I64(0)])), None);
        assert_eq!(groups.get(&key(&[Value::I32(1), Value::Null])), None);
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(key(&[Value::F64(f64::NAN)]), key(&[Value::F64(f64::NAN)]));
        assert_ne!(key(&[Value::F64(0.0)]), key(&[Value::F64(-0.0)]));
    }

    #[test]
    fn all_null_keys() {
        assert!(key(&[Value::Null, Value::Null]).is_null());
        assert!(!key(&[Value::Null, Value::from("x")]).is_null());
    }
}
