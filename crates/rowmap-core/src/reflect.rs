mod container;
mod dynamic;
mod scalar;

use crate::{Bean, Result, Type, Value};

use std::{any::Any, fmt};

/// Types with a statically known [`Type`].
pub trait Typed {
    fn ty() -> Type;
}

/// Dynamic access to one node of an object graph.
///
/// Every property type implements this trait. Navigation goes through
/// [`Reflect::resolve`], which unwraps `Option` and `Box` layers and returns
/// `None` for absent values.
pub trait Reflect: Any + Send + Sync + fmt::Debug {
    /// Type of this node, including type arguments of generic beans.
    fn reflect_ty(&self) -> Type;

    fn to_value(&self) -> Value;

    /// Replaces this node with `value`, converting as needed.
    fn assign(&mut self, value: Value) -> Result<()>;

    /// The present value behind this node, or `None` when it is null.
    fn resolve(&self) -> Option<&dyn Reflect>;

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn as_any(&self) -> &dyn Any;

    fn as_bean(&self) -> Option<&dyn Bean> {
        None
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        None
    }

    /// Element at `index` for lists and arrays.
    fn element(&self, _index: usize) -> Option<&dyn Reflect> {
        None
    }

    fn element_mut(&mut self, _index: usize) -> Option<&mut dyn Reflect> {
        None
    }

    /// Number of elements for lists and arrays, `None` for anything else.
    fn len(&self) -> Option<usize> {
        None
    }
}

/// A property type that can be rebuilt from a [`Value`].
pub trait Field: Typed + Reflect + Sized {
    fn from_value(value: Value) -> Result<Self>;
}
