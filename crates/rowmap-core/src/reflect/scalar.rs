use super::{Field, Reflect, Typed};
use crate::{Error, Result, Type, Value};

use std::any::Any;

macro_rules! impl_scalar {
    ( $( $t:ty => $variant:ident, )* ) => {
        $(
            impl Typed for $t {
                fn ty() -> Type {
                    Type::$variant
                }
            }

            impl Reflect for $t {
                fn reflect_ty(&self) -> Type {
                    Type::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn assign(&mut self, value: Value) -> Result<()> {
                    *self = <$t as Field>::from_value(value)?;
                    Ok(())
                }

                fn resolve(&self) -> Option<&dyn Reflect> {
                    Some(self as &dyn Reflect)
                }

                fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
                    Some(self as &mut dyn Reflect)
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }
            }

            impl Field for $t {
                fn from_value(value: Value) -> Result<Self> {
                    match value.cast(&Type::$variant)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::type_conversion(other.infer_ty(), stringify!($t))),
                    }
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
}
