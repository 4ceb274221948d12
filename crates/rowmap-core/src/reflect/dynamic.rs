use super::{Field, Reflect, Typed};
use crate::{Bean, Result, Type, Value};

use std::any::Any;

impl Typed for Value {
    fn ty() -> Type {
        Type::Any
    }
}

impl Reflect for Value {
    fn reflect_ty(&self) -> Type {
        self.infer_ty()
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn assign(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }

    fn resolve(&self) -> Option<&dyn Reflect> {
        match self {
            Value::Null => None,
            Value::Bean(object) => Some(object.as_reflect()),
            value => Some(value as &dyn Reflect),
        }
    }

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
        match self {
            Value::Null => None,
            Value::Bean(object) => Some(object.as_reflect_mut()),
            value => Some(value as &mut dyn Reflect),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        match self {
            Value::Bean(object) => Some(object.as_bean()),
            _ => None,
        }
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        match self {
            Value::Bean(object) => Some(object.as_bean_mut()),
            _ => None,
        }
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        match self {
            Value::List(items) => items.get(index).map(|item| item as &dyn Reflect),
            _ => None,
        }
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        match self {
            Value::List(items) => items.get_mut(index).map(|item| item as &mut dyn Reflect),
            _ => None,
        }
    }

    fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl Field for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
