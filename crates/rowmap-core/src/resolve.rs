//! Static type resolution of property paths.
//!
//! Resolution walks a path against a [`Type`], looking properties up in bean
//! descriptors (including flattened ones) and substituting the type arguments
//! of generic beans as it goes. The result is a list of hops that accessors
//! can replay without looking anything up by name again.

use crate::{BeanRef, Error, PropertyDescriptor, PropertyPath, Result, Step, Type};

/// A property found on a bean.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    /// Declared name of the property.
    pub name: &'static str,

    /// Property type with all type variables substituted.
    pub ty: Type,

    /// Slots to follow from the bean: flattened properties first, the
    /// property itself last.
    pub route: Vec<usize>,

    pub writable: bool,
}

/// How one path step is performed.
#[derive(Debug, Clone)]
pub enum HopKind {
    Property(ResolvedProperty),

    Index(usize),

    /// The static type is [`Type::Any`]; the step is looked up on the live
    /// value.
    Dynamic(Step),
}

#[derive(Debug, Clone)]
pub struct Hop {
    pub kind: HopKind,

    /// Type the step navigates from, with `Option` layers removed.
    pub owner: Type,
}

/// The outcome of resolving a whole path.
#[derive(Debug, Clone)]
pub struct Walk {
    pub hops: Vec<Hop>,

    /// Type addressed by the last step.
    pub ty: Type,
}

/// Finds `name` on `bean`, descending into flattened properties.
pub fn property(bean: &BeanRef, name: &str) -> Result<Option<ResolvedProperty>> {
    find(bean, &|property| property.name == name)
}

/// Like [`property`], comparing names without regard to ASCII case.
pub fn property_ignore_case(bean: &BeanRef, name: &str) -> Result<Option<ResolvedProperty>> {
    find(bean, &|property| property.name.eq_ignore_ascii_case(name))
}

fn find(
    bean: &BeanRef,
    matches: &dyn Fn(&PropertyDescriptor) -> bool,
) -> Result<Option<ResolvedProperty>> {
    let descriptor = bean.descriptor();

    if let Some(property) = descriptor
        .properties
        .iter()
        .find(|property| !property.flatten && matches(property))
    {
        let ty = bean.property_type(property)?;

        if ty.has_vars() {
            return Err(Error::introspection(format!(
                "type of `{bean}.{}` is not fully resolved: `{ty}`",
                property.name
            )));
        }

        return Ok(Some(ResolvedProperty {
            name: property.name,
            ty,
            route: vec![property.slot],
            writable: property.writable,
        }));
    }

    for flattened in descriptor.flattened() {
        let base = bean.property_type(flattened)?;

        let Type::Bean(base) = base.strip_option() else {
            return Err(Error::introspection(format!(
                "flattened property `{bean}.{}` is not a bean",
                flattened.name
            )));
        };

        if let Some(mut found) = find(base, matches)? {
            found.route.insert(0, flattened.slot);
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// The error raised when a property lookup misses.
pub fn missing_property(owner: &Type, name: &str) -> Error {
    Error::introspection(format!("`{owner}` has no property `{name}`"))
}

/// Resolves every step of `path` starting from `root`.
pub fn walk(root: &Type, path: &PropertyPath) -> Result<Walk> {
    let mut hops = Vec::with_capacity(path.len());
    let mut current = root.clone();

    for (i, step) in path.steps().enumerate() {
        let owner = current.strip_option().clone();

        let (kind, next) = match (step, &owner) {
            (step, Type::Any) => (HopKind::Dynamic(step.clone()), Type::Any),
            (Step::Property(name), Type::Bean(bean)) => {
                let found = property(bean, name)?.ok_or_else(|| missing_property(&owner, name))?;
                let ty = found.ty.clone();
                (HopKind::Property(found), ty)
            }
            (Step::Property(name), owner) => return Err(missing_property(owner, name)),
            (Step::Index(index), Type::List(elem) | Type::Array(elem)) => {
                (HopKind::Index(*index), (**elem).clone())
            }
            (Step::Index(_), owner) => {
                return Err(Error::invalid_path(
                    path.as_str(),
                    path.offset(i),
                    format!("cannot index into `{owner}`"),
                ))
            }
        };

        hops.push(Hop { kind, owner });
        current = next;
    }

    Ok(Walk { hops, ty: current })
}

/// Type addressed by `path` on `root`.
pub fn property_type(root: &Type, path: &PropertyPath) -> Result<Type> {
    walk(root, path).map(|walk| walk.ty)
}

/// Parameter slot selected by the first step of a parameter path: `value`
/// is slot 0, an ordinal `n` is slot `n - 1`.
pub fn parameter_slot(path: &PropertyPath) -> Result<usize> {
    match path.first() {
        Some(Step::Property(name)) if name == "value" => Ok(0),
        Some(Step::Index(0)) => Err(Error::invalid_path(
            path.as_str(),
            path.offset(0),
            "parameter ordinals start at 1",
        )),
        Some(Step::Index(ordinal)) => Ok(ordinal - 1),
        Some(Step::Property(name)) => Err(Error::introspection(format!(
            "unknown parameter `{name}`; expected `value` or a 1-based ordinal"
        ))),
        None => Err(Error::invalid_path(path.as_str(), 0, "empty property path")),
    }
}

/// Type of the parameter slot selected by `path`.
pub fn parameter_slot_type<'a>(params: &'a [Type], path: &PropertyPath) -> Result<(usize, &'a Type)> {
    let slot = parameter_slot(path)?;
    let ty = params.get(slot).ok_or_else(|| {
        Error::introspection(format!(
            "parameter `{}` is out of range; {} parameter(s) declared",
            path.prefix(1),
            params.len()
        ))
    })?;
    Ok((slot, ty))
}

/// Type addressed by a parameter path such as `2.article.subject`.
pub fn parameter_type(params: &[Type], path: &PropertyPath) -> Result<Type> {
    let (_, ty) = parameter_slot_type(params, path)?;
    property_type(ty, &path.tail(1))
}
