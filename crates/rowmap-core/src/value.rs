mod cast;

mod object;
pub use object::Object;

use crate::{Bean, Error, Result, Type};

/// A dynamically typed value moving between rows, parameters and beans.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),

    /// A list or array of values.
    List(Vec<Value>),

    /// A bean instance.
    Bean(Object),

    /// SQL null or an absent optional value.
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub fn bean(bean: impl Bean) -> Value {
        Value::Bean(Object::new(bean))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Best-effort type of the value. Null and empty lists infer `Any`
    /// components.
    pub fn infer_ty(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::I8(_) => Type::I8,
            Value::I16(_) => Type::I16,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::U8(_) => Type::U8,
            Value::U16(_) => Type::U16,
            Value::U32(_) => Type::U32,
            Value::U64(_) => Type::U64,
            Value::F32(_) => Type::F32,
            Value::F64(_) => Type::F64,
            Value::Char(_) => Type::Char,
            Value::String(_) => Type::String,
            Value::Bytes(_) => Type::Bytes,
            Value::List(items) => Type::list(
                items
                    .iter()
                    .find(|item| !item.is_null())
                    .map(Value::infer_ty)
                    .unwrap_or(Type::Any),
            ),
            Value::Bean(object) => object.ty(),
            Value::Null => Type::Any,
        }
    }

    /// Moves the bean out of this value.
    pub fn into_bean<B: Bean>(self) -> Result<B> {
        match self {
            Value::Bean(object) => object
                .downcast::<B>()
                .map_err(|object| Error::type_conversion(object.ty(), std::any::type_name::<B>())),
            value => Err(Error::type_conversion(
                value.infer_ty(),
                std::any::type_name::<B>(),
            )),
        }
    }
}

macro_rules! impl_from {
    ( $( $t:ty => $variant:ident, )* ) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Value {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
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
    Vec<Value> => List,
    Object => Bean,
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}
