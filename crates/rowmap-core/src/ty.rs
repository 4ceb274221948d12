use crate::{bean::BeanRef, Error, Result, Value};

use std::fmt;

/// Static description of the type stored at a property, parameter slot or
/// column.
///
/// Generic beans describe their declared field types with [`Type::Var`]
/// placeholders; [`Type::substitute`] replaces them with the actual type
/// arguments of a [`BeanRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Bytes,

    /// Nullable value (`Option<T>`).
    Option(Box<Type>),

    /// Growable sequence (`Vec<T>`).
    List(Box<Type>),

    /// Fixed-size sequence (`Box<[T]>`).
    Array(Box<Type>),

    /// A bean, possibly parameterized.
    Bean(BeanRef),

    /// An unbound type parameter of a generic bean.
    Var(&'static str),

    /// Any value; properties declared as [`Value`].
    Any,
}

impl Type {
    pub fn option(ty: Type) -> Type {
        Type::Option(Box::new(ty))
    }

    pub fn list(ty: Type) -> Type {
        Type::List(Box::new(ty))
    }

    pub fn array(ty: Type) -> Type {
        Type::Array(Box::new(ty))
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Type::Option(_))
    }

    pub fn is_bean(&self) -> bool {
        matches!(self, Type::Bean(_))
    }

    /// Strips every `Option` layer.
    pub fn strip_option(&self) -> &Type {
        let mut ty = self;
        while let Type::Option(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Element type of a list or array.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::List(elem) | Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_bean(&self) -> Option<&BeanRef> {
        match self {
            Type::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Returns `true` if the type still mentions a type variable.
    pub fn has_vars(&self) -> bool {
        match self {
            Type::Var(_) => true,
            Type::Option(ty) | Type::List(ty) | Type::Array(ty) => ty.has_vars(),
            Type::Bean(bean) => bean.args().iter().any(Type::has_vars),
            _ => false,
        }
    }

    /// The value stored when a SQL null is mapped onto a non-nullable
    /// property of this type. `None` for types that accept null.
    pub fn zero_value(&self) -> Option<Value> {
        Some(match self {
            Type::Bool => Value::Bool(false),
            Type::I8 => Value::I8(0),
            Type::I16 => Value::I16(0),
            Type::I32 => Value::I32(0),
            Type::I64 => Value::I64(0),
            Type::U8 => Value::U8(0),
            Type::U16 => Value::U16(0),
            Type::U32 => Value::U32(0),
            Type::U64 => Value::U64(0),
            Type::F32 => Value::F32(0.0),
            Type::F64 => Value::F64(0.0),
            Type::Char => Value::Char('\0'),
            Type::String => Value::String(String::new()),
            Type::Bytes => Value::Bytes(vec![]),
            Type::List(_) | Type::Array(_) => Value::List(vec![]),
            _ => return None,
        })
    }

    /// Replaces type variables named in `params` with the matching entry of
    /// `args`. `owner` names the generic type for error messages.
    pub fn substitute(
        &self,
        params: &[&'static str],
        args: &[Type],
        owner: &dyn fmt::Display,
    ) -> Result<Type> {
        Ok(match self {
            Type::Var(name) => {
                let bound = params
                    .iter()
                    .position(|param| param == name)
                    .and_then(|index| args.get(index));

                match bound {
                    Some(ty) => ty.clone(),
                    None => {
                        return Err(Error::introspection(format!(
                            "type variable `{name}` is not bound in `{owner}`"
                        )))
                    }
                }
            }
            Type::Option(ty) => Type::option(ty.substitute(params, args, owner)?),
            Type::List(ty) => Type::list(ty.substitute(params, args, owner)?),
            Type::Array(ty) => Type::array(ty.substitute(params, args, owner)?),
            Type::Bean(bean) => Type::Bean(bean.substitute(params, args, owner)?),
            ty => ty.clone(),
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::I8 => f.write_str("i8"),
            Type::I16 => f.write_str("i16"),
            Type::I32 => f.write_str("i32"),
            Type::I64 => f.write_str("i64"),
            Type::U8 => f.write_str("u8"),
            Type::U16 => f.write_str("u16"),
            Type::U32 => f.write_str("u32"),
            Type::U64 => f.write_str("u64"),
            Type::F32 => f.write_str("f32"),
            Type::F64 => f.write_str("f64"),
            Type::Char => f.write_str("char"),
            Type::String => f.write_str("String"),
            Type::Bytes => f.write_str("Bytes"),
            Type::Option(ty) => write!(f, "Option<{ty}>"),
            Type::List(ty) => write!(f, "Vec<{ty}>"),
            Type::Array(ty) => write!(f, "Box<[{ty}]>"),
            Type::Bean(bean) => fmt::Display::fmt(bean, f),
            Type::Var(name) => f.write_str(name),
            Type::Any => f.write_str("Value"),
        }
    }
}
