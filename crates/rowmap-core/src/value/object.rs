use crate::{Bean, Reflect, Type};

use std::fmt;

/// An owned, type-erased bean stored inside a [`Value`](crate::Value).
pub struct Object(Box<dyn Bean>);

impl Object {
    pub fn new(bean: impl Bean) -> Object {
        Object(Box::new(bean))
    }

    pub fn from_box(bean: Box<dyn Bean>) -> Object {
        Object(bean)
    }

    pub fn ty(&self) -> Type {
        self.0.reflect_ty()
    }

    pub fn as_bean(&self) -> &dyn Bean {
        &*self.0
    }

    pub fn as_bean_mut(&mut self) -> &mut dyn Bean {
        &mut *self.0
    }

    pub fn as_reflect(&self) -> &dyn Reflect {
        self.0.as_reflect()
    }

    pub fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self.0.as_reflect_mut()
    }

    pub fn into_box(self) -> Box<dyn Bean> {
        self.0
    }

    /// Recovers the concrete bean, or returns the object unchanged.
    pub fn downcast<B: Bean>(self) -> Result<B, Object> {
        if self.0.as_any().is::<B>() {
            match self.0.into_any().downcast::<B>() {
                Ok(bean) => Ok(*bean),
                Err(_) => unreachable!("type checked above"),
            }
        } else {
            Err(self)
        }
    }
}

impl Clone for Object {
    fn clone(&self) -> Object {
        Object(self.0.clone_bean())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        self.0.eq_bean(other.as_bean())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
