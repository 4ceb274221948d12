use crate::{Reflect, Result, Type};

use by_address::ByAddress;
use std::{any::Any, fmt, hash};

/// A struct whose properties can be addressed by name at runtime.
///
/// Implemented by `#[derive(Bean)]`. Properties are identified by their slot:
/// the position of the field in the descriptor.
pub trait Bean: Reflect {
    /// The descriptor shared by every instantiation of this bean.
    fn describe() -> &'static BeanDescriptor
    where
        Self: Sized;

    fn descriptor(&self) -> &'static BeanDescriptor;

    fn property(&self, slot: usize) -> Option<&dyn Reflect>;

    fn property_mut(&mut self, slot: usize) -> Option<&mut dyn Reflect>;

    fn clone_bean(&self) -> Box<dyn Bean>;

    fn eq_bean(&self, other: &dyn Bean) -> bool;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// Runtime description of a bean definition.
#[derive(Debug)]
pub struct BeanDescriptor {
    /// Type name without arguments.
    pub name: &'static str,

    /// Names of the generic type parameters, in declaration order.
    pub params: Vec<&'static str>,

    /// Properties in slot order.
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug)]
pub struct PropertyDescriptor {
    pub name: &'static str,

    pub slot: usize,

    /// Declared type; may mention the bean's type parameters.
    pub ty: Type,

    /// The property's own properties are exposed on the enclosing bean.
    pub flatten: bool,

    /// `false` for read-only properties.
    pub writable: bool,
}

impl BeanDescriptor {
    /// Finds a directly declared, non-flattened property.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|property| !property.flatten && property.name == name)
    }

    /// Like [`BeanDescriptor::property`], ignoring ASCII case.
    pub fn property_ignore_case(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|property| !property.flatten && property.name.eq_ignore_ascii_case(name))
    }

    pub fn flattened(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|property| property.flatten)
    }

    /// Finds the slot route to `name`, descending into flattened properties.
    ///
    /// The last entry is the slot of the property itself; earlier entries are
    /// the flattened properties leading to it. Only descriptors reachable
    /// without type arguments are searched, which is always the case for live
    /// objects.
    pub fn route(&self, name: &str) -> Option<Vec<usize>> {
        if let Some(property) = self.property(name) {
            return Some(vec![property.slot]);
        }

        for flattened in self.flattened() {
            let Some(base) = flattened.ty.strip_option().as_bean() else {
                continue;
            };

            if let Some(mut route) = base.descriptor().route(name) {
                route.insert(0, flattened.slot);
                return Some(route);
            }
        }

        None
    }
}

impl PartialEq for BeanDescriptor {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for BeanDescriptor {}

/// A reference to a bean type together with its actual type arguments.
///
/// The descriptor is reached through a function so that self-referential
/// beans can mention their own type while their descriptor is being built.
#[derive(Clone)]
pub struct BeanRef {
    describe: fn() -> &'static BeanDescriptor,
    args: Vec<Type>,
}

impl BeanRef {
    pub fn new(describe: fn() -> &'static BeanDescriptor, args: Vec<Type>) -> BeanRef {
        BeanRef { describe, args }
    }

    pub fn descriptor(&self) -> &'static BeanDescriptor {
        (self.describe)()
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn args(&self) -> &[Type] {
        &self.args
    }

    /// The declared type of `property`, with this reference's type arguments
    /// substituted.
    pub fn property_type(&self, property: &PropertyDescriptor) -> Result<Type> {
        property
            .ty
            .substitute(&self.descriptor().params, &self.args, self)
    }

    pub(crate) fn substitute(
        &self,
        params: &[&'static str],
        args: &[Type],
        owner: &dyn fmt::Display,
    ) -> Result<BeanRef> {
        Ok(BeanRef {
            describe: self.describe,
            args: self
                .args
                .iter()
                .map(|arg| arg.substitute(params, args, owner))
                .collect::<Result<_>>()?,
        })
    }
}

impl PartialEq for BeanRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor(), other.descriptor()) && self.args == other.args
    }
}

impl Eq for BeanRef {}

impl hash::Hash for BeanRef {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        ByAddress(self.descriptor()).hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;

        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt::Display::fmt(arg, f)?;
            }
            f.write_str(">")?;
        }

        Ok(())
    }
}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanRef({self})")
    }
}
