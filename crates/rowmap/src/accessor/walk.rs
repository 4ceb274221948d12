//! Navigation of live object graphs, shared by both strategies.

use rowmap_core::{
    resolve::missing_property, Bean, BeanDescriptor, Error, PropertyPath, Reflect, Result, Step,
    Type, Value,
};

use by_address::ByAddress;
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

type Routes = HashMap<ByAddress<&'static BeanDescriptor>, HashMap<Box<str>, Option<Arc<[usize]>>>>;

static ROUTES: LazyLock<RwLock<Routes>> = LazyLock::new(Default::default);

/// Slot route to `name` on beans described by `descriptor`, memoized per
/// descriptor and name.
pub(super) fn route(descriptor: &'static BeanDescriptor, name: &str) -> Option<Arc<[usize]>> {
    if let Some(found) = ROUTES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&ByAddress(descriptor))
        .and_then(|names| names.get(name))
    {
        return found.clone();
    }

    let found: Option<Arc<[usize]>> = descriptor.route(name).map(Into::into);

    ROUTES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(ByAddress(descriptor))
        .or_default()
        .entry(name.into())
        .or_insert(found)
        .clone()
}

/// Follows a slot route from `bean`. `None` when a flattened property on the
/// way is absent.
pub(super) fn follow<'a>(bean: &'a dyn Bean, route: &[usize]) -> Option<&'a dyn Reflect> {
    let (last, flattened) = route.split_last()?;
    let mut bean = bean;

    for slot in flattened {
        bean = bean.property(*slot)?.resolve()?.as_bean()?;
    }

    bean.property(*last)
}

pub(super) fn follow_mut<'a>(bean: &'a mut dyn Bean, route: &[usize]) -> Option<&'a mut dyn Reflect> {
    let (last, flattened) = route.split_last()?;
    let mut bean = bean;

    for slot in flattened {
        bean = bean.property_mut(*slot)?.resolve_mut()?.as_bean_mut()?;
    }

    bean.property_mut(*last)
}

/// Present value at the root, or the error for a null root.
pub(super) fn root<'a>(
    root: &'a dyn Reflect,
    path: &PropertyPath,
    root_ty: &Type,
) -> Result<&'a dyn Reflect> {
    root.resolve()
        .ok_or_else(|| Error::null_navigation(path.prefix(0), root_ty))
}

pub(super) fn root_mut<'a>(
    root: &'a mut dyn Reflect,
    path: &PropertyPath,
    root_ty: &Type,
) -> Result<&'a mut dyn Reflect> {
    root.resolve_mut()
        .ok_or_else(|| Error::null_navigation(path.prefix(0), root_ty))
}

/// Performs step `i` of `path` by name on a live node.
pub(super) fn step<'a>(
    node: &'a dyn Reflect,
    path: &PropertyPath,
    i: usize,
    step: &Step,
) -> Result<&'a dyn Reflect> {
    match step {
        Step::Property(name) => property(node, path, i, name),
        Step::Index(index) => element(node, path, i, *index),
    }
}

pub(super) fn step_mut<'a>(
    node: &'a mut dyn Reflect,
    path: &PropertyPath,
    i: usize,
    step: &Step,
    owner: &Type,
) -> Result<&'a mut dyn Reflect> {
    match step {
        Step::Property(name) => property_mut(node, path, i, name, owner),
        Step::Index(index) => element_mut(node, path, i, *index, owner),
    }
}

fn property<'a>(
    node: &'a dyn Reflect,
    path: &PropertyPath,
    i: usize,
    name: &str,
) -> Result<&'a dyn Reflect> {
    let bean = node
        .as_bean()
        .ok_or_else(|| missing_property(&node.reflect_ty(), name))?;
    let route = route(bean.descriptor(), name)
        .ok_or_else(|| missing_property(&node.reflect_ty(), name))?;

    follow(bean, &route).ok_or_else(|| Error::null_navigation(path.prefix(i + 1), node.reflect_ty()))
}

fn property_mut<'a>(
    node: &'a mut dyn Reflect,
    path: &PropertyPath,
    i: usize,
    name: &str,
    owner: &Type,
) -> Result<&'a mut dyn Reflect> {
    let Some(bean) = node.as_bean_mut() else {
        return Err(missing_property(owner, name));
    };
    let route = route(bean.descriptor(), name).ok_or_else(|| missing_property(owner, name))?;

    follow_mut(bean, &route).ok_or_else(|| Error::null_navigation(path.prefix(i + 1), owner))
}

pub(super) fn element<'a>(
    node: &'a dyn Reflect,
    path: &PropertyPath,
    i: usize,
    index: usize,
) -> Result<&'a dyn Reflect> {
    node.element(index)
        .ok_or_else(|| out_of_bounds(path, i, index, node.len(), &node.reflect_ty()))
}

pub(super) fn element_mut<'a>(
    node: &'a mut dyn Reflect,
    path: &PropertyPath,
    i: usize,
    index: usize,
    owner: &Type,
) -> Result<&'a mut dyn Reflect> {
    let len = node.len();
    node.element_mut(index)
        .ok_or_else(|| out_of_bounds(path, i, index, len, owner))
}

fn out_of_bounds(path: &PropertyPath, i: usize, index: usize, len: Option<usize>, owner: &Type) -> Error {
    match len {
        Some(len) => Error::index_out_of_bounds(path.prefix(i + 1), index, len),
        None => Error::invalid_path(
            path.as_str(),
            path.offset(i),
            format!("cannot index into `{owner}`"),
        ),
    }
}

/// Reads `path` from `root`, looking every step up by name.
pub(super) fn read(root: &dyn Reflect, path: &PropertyPath, root_ty: &Type) -> Result<Value> {
    let mut node = self::root(root, path, root_ty)?;
    let last = path.len().saturating_sub(1);

    for (i, step) in path.steps().enumerate() {
        let child = self::step(node, path, i, step)?;

        if i == last {
            return Ok(child.to_value());
        }

        node = child
            .resolve()
            .ok_or_else(|| Error::null_navigation(path.prefix(i + 1), node.reflect_ty()))?;
    }

    Ok(node.to_value())
}

/// Writes `value` at `path` below `root`, looking every step up by name.
pub(super) fn write(
    root: &mut dyn Reflect,
    path: &PropertyPath,
    root_ty: &Type,
    value: Value,
) -> Result<()> {
    let mut node = root_mut(root, path, root_ty)?;
    let last = path.len().saturating_sub(1);

    for (i, step) in path.steps().enumerate() {
        let owner = node.reflect_ty();
        let child = step_mut(node, path, i, step, &owner)?;

        if i == last {
            return child.assign(value);
        }

        node = child
            .resolve_mut()
            .ok_or_else(|| Error::null_navigation(path.prefix(i + 1), &owner))?;
    }

    node.assign(value)
}
