use crate::{Error, Result, Type, Value};

impl Value {
    /// Converts the value to `ty`.
    ///
    /// Null passes through unchanged. Integer conversions are checked; floats
    /// never truncate into integers.
    pub fn cast(self, ty: &Type) -> Result<Value> {
        if self.is_null() {
            return Ok(self);
        }

        match ty {
            Type::Any => return Ok(self),
            Type::Option(inner) => return self.cast(inner),
            _ => {}
        }

        if let Some(value) = self.as_i128() {
            if let Some(cast) = cast_int(value, ty) {
                return cast.ok_or_else(|| Error::type_conversion(self.infer_ty(), ty));
            }
        }

        match (self, ty) {
            (Value::Bool(v), Type::Bool) => Ok(Value::Bool(v)),
            (Value::F32(v), Type::F32) => Ok(Value::F32(v)),
            (Value::F32(v), Type::F64) => Ok(Value::F64(f64::from(v))),
            (Value::F64(v), Type::F64) => Ok(Value::F64(v)),
            (Value::F64(v), Type::F32) => Ok(Value::F32(v as f32)),
            (Value::Char(v), Type::Char) => Ok(Value::Char(v)),
            (Value::Char(v), Type::String) => Ok(Value::String(v.to_string())),
            (Value::String(v), Type::String) => Ok(Value::String(v)),
            (Value::String(v), Type::Char) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(Error::type_conversion(
                        format!("String of length {}", v.chars().count()),
                        ty,
                    )),
                }
            }
            (Value::String(v), Type::Bytes) => Ok(Value::Bytes(v.into_bytes())),
            (Value::Bytes(v), Type::Bytes) => Ok(Value::Bytes(v)),
            (Value::List(items), Type::Bytes) => items
                .into_iter()
                .map(|item| match item.cast(&Type::U8)? {
                    Value::U8(byte) => Ok(byte),
                    other => Err(Error::type_conversion(other.infer_ty(), Type::U8)),
                })
                .collect::<Result<_>>()
                .map(Value::Bytes),
            (Value::Bytes(v), Type::String) => String::from_utf8(v)
                .map(Value::String)
                .map_err(|_| Error::type_conversion("non UTF-8 Bytes", ty)),
            (Value::Bytes(v), Type::List(elem)) | (Value::Bytes(v), Type::Array(elem)) => v
                .into_iter()
                .map(|byte| Value::U8(byte).cast(elem))
                .collect::<Result<_>>()
                .map(Value::List),
            (Value::List(items), Type::List(elem)) | (Value::List(items), Type::Array(elem)) => {
                items
                    .into_iter()
                    .map(|item| item.cast(elem))
                    .collect::<Result<_>>()
                    .map(Value::List)
            }
            (Value::Bean(object), Type::Bean(bean))
                if std::ptr::eq(object.as_bean().descriptor(), bean.descriptor()) =>
            {
                Ok(Value::Bean(object))
            }
            (value, ty) => Err(Error::type_conversion(value.infer_ty(), ty)),
        }
    }

    fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Value::I8(v) => v.into(),
            Value::I16(v) => v.into(),
            Value::I32(v) => v.into(),
            Value::I64(v) => v.into(),
            Value::U8(v) => v.into(),
            Value::U16(v) => v.into(),
            Value::U32(v) => v.into(),
            Value::U64(v) => v.into(),
            _ => return None,
        })
    }
}

/// Converts an integer to `ty`. The outer `None` means `ty` is not a target
/// for integers; the inner `None` means the value does not fit.
fn cast_int(value: i128, ty: &Type) -> Option<Option<Value>> {
    Some(match ty {
        Type::I8 => i8::try_from(value).ok().map(Value::I8),
        Type::I16 => i16::try_from(value).ok().map(Value::I16),
        Type::I32 => i32::try_from(value).ok().map(Value::I32),
        Type::I64 => i64::try_from(value).ok().map(Value::I64),
        Type::U8 => u8::try_from(value).ok().map(Value::U8),
        Type::U16 => u16::try_from(value).ok().map(Value::U16),
        Type::U32 => u32::try_from(value).ok().map(Value::U32),
        Type::U64 => u64::try_from(value).ok().map(Value::U64),
        Type::Bool => match value {
            0 => Some(Value::Bool(false)),
            1 => Some(Value::Bool(true)),
            _ => None,
        },
        Type::F32 => Some(Value::F32(value as f32)),
        Type::F64 => Some(Value::F64(value as f64)),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integers_narrow_when_in_range() {
        assert_eq!(Value::I64(42).cast(&Type::I32).unwrap(), Value::I32(42));
        assert_eq!(Value::I64(1).cast(&Type::Bool).unwrap(), Value::Bool(true));
        assert_eq!(Value::I32(7).cast(&Type::F64).unwrap(), Value::F64(7.0));
    }

    #[test]
    fn integers_out_of_range_fail() {
        let err = Value::I64(300).cast(&Type::U8).unwrap_err();
        assert!(err.is_type_conversion());
        assert_eq!(err.to_string(), "cannot convert i64 to u8");

        assert!(Value::I64(-1).cast(&Type::U64).is_err());
        assert!(Value::I64(2).cast(&Type::Bool).is_err());
    }

    #[test]
    fn floats_do_not_truncate() {
        assert!(Value::F64(1.5).cast(&Type::I64).is_err());
        assert_eq!(Value::F64(1.5).cast(&Type::F32).unwrap(), Value::F32(1.5));
    }

    #[test]
    fn null_passes_through() {
        assert_eq!(Value::Null.cast(&Type::I32).unwrap(), Value::Null);
        assert_eq!(
            Value::I64(3).cast(&Type::option(Type::I16)).unwrap(),
            Value::I16(3)
        );
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(
            Value::from("x").cast(&Type::Char).unwrap(),
            Value::Char('x')
        );
        assert!(Value::from("xy").cast(&Type::Char).is_err());
        assert_eq!(
            Value::Bytes(b"abc".to_vec()).cast(&Type::String).unwrap(),
            Value::from("abc")
        );
    }

    #[test]
    fn lists_cast_elementwise() {
        let list = Value::List(vec![Value::I64(1), Value::Null, Value::I64(3)]);
        assert_eq!(
            list.cast(&Type::array(Type::option(Type::I32))).unwrap(),
            Value::List(vec![Value::I32(1), Value::Null, Value::I32(3)])
        );
    }
}
