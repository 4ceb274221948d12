use super::{check_root, check_writable, expected, walk, Getter, Setter};

use rowmap_core::{
    resolve::{self, missing_property, HopKind, Walk},
    BeanDescriptor, Error, PropertyPath, Reflect, Result, Step, Type, Value,
};

use std::{borrow::Cow, fmt, sync::Arc};

type Read = Box<dyn Fn(&dyn Reflect) -> Result<Value> + Send + Sync>;
type Write = Box<dyn Fn(&mut dyn Reflect, Value) -> Result<()> + Send + Sync>;

/// Reads through a chain of closures built from the resolved path.
pub(super) struct CompiledGetter {
    root: Type,
    expected: Option<&'static BeanDescriptor>,
    path: PropertyPath,
    ty: Type,
    read: Read,
}

/// Writes through a chain of closures built from the resolved path.
pub(super) struct CompiledSetter {
    root: Type,
    expected: Option<&'static BeanDescriptor>,
    path: PropertyPath,
    ty: Type,
    write: Write,
}

/// One resolved step of the path.
#[derive(Debug)]
struct Hop {
    select: Select,

    /// Position of the step in the path.
    index: usize,

    path: PropertyPath,

    /// Static type the step navigates from.
    owner: Type,
}

#[derive(Debug)]
enum Select {
    Route {
        name: &'static str,
        route: Arc<[usize]>,
    },
    Index(usize),

    /// Looked up by name on the live value.
    Dynamic(Step),
}

impl CompiledGetter {
    pub(super) fn new(root: &Type, path: PropertyPath) -> Result<CompiledGetter> {
        let walk = resolve::walk(root, &path)?;
        let ty = walk.ty.clone();

        Ok(CompiledGetter {
            root: root.clone(),
            expected: expected(root),
            read: compile_read(hops(walk, &path)),
            path,
            ty,
        })
    }
}

impl Getter for CompiledGetter {
    fn get(&self, root: &dyn Reflect) -> Result<Value> {
        let node = walk::root(root, &self.path, &self.root)?;
        check_root(self.expected, &self.root, node)?;
        (self.read)(node)
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn path(&self) -> &PropertyPath {
        &self.path
    }
}

impl CompiledSetter {
    pub(super) fn new(root: &Type, path: PropertyPath) -> Result<CompiledSetter> {
        let walk = resolve::walk(root, &path)?;
        check_writable(&walk, &path)?;
        let ty = walk.ty.clone();

        Ok(CompiledSetter {
            root: root.clone(),
            expected: expected(root),
            write: compile_write(hops(walk, &path)),
            path,
            ty,
        })
    }
}

impl Setter for CompiledSetter {
    fn set(&self, root: &mut dyn Reflect, value: Value) -> Result<()> {
        let node = walk::root_mut(root, &self.path, &self.root)?;
        check_root(self.expected, &self.root, node)?;
        (self.write)(node, value)
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn path(&self) -> &PropertyPath {
        &self.path
    }
}

impl Hop {
    fn select<'a>(&self, node: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        match &self.select {
            Select::Route { name, route } => {
                let bean = node
                    .as_bean()
                    .ok_or_else(|| missing_property(&self.owner, name))?;
                walk::follow(bean, route).ok_or_else(|| self.null(&self.owner))
            }
            Select::Index(index) => walk::element(node, &self.path, self.index, *index),
            Select::Dynamic(step) => walk::step(node, &self.path, self.index, step),
        }
    }

    fn select_mut<'a>(&self, node: &'a mut dyn Reflect, owner: &Type) -> Result<&'a mut dyn Reflect> {
        match &self.select {
            Select::Route { name, route } => {
                let Some(bean) = node.as_bean_mut() else {
                    return Err(missing_property(owner, name));
                };
                walk::follow_mut(bean, route).ok_or_else(|| self.null(owner))
            }
            Select::Index(index) => walk::element_mut(node, &self.path, self.index, *index, owner),
            Select::Dynamic(step) => walk::step_mut(node, &self.path, self.index, step, owner),
        }
    }

    /// Type named in diagnostics for this step.
    fn owner(&self, node: &dyn Reflect) -> Cow<'_, Type> {
        match self.select {
            Select::Dynamic(_) => Cow::Owned(node.reflect_ty()),
            _ => Cow::Borrowed(&self.owner),
        }
    }

    fn null(&self, owner: &Type) -> Error {
        Error::null_navigation(self.path.prefix(self.index + 1), owner)
    }
}

fn hops(walk: Walk, path: &PropertyPath) -> Vec<Hop> {
    walk.hops
        .into_iter()
        .enumerate()
        .map(|(index, hop)| Hop {
            select: match hop.kind {
                HopKind::Property(property) => Select::Route {
                    name: property.name,
                    route: property.route.into(),
                },
                HopKind::Index(i) => Select::Index(i),
                HopKind::Dynamic(step) => Select::Dynamic(step),
            },
            index,
            path: path.clone(),
            owner: hop.owner,
        })
        .collect()
}

fn compile_read(hops: Vec<Hop>) -> Read {
    let mut hops = hops.into_iter().rev();

    let Some(last) = hops.next() else {
        return Box::new(|node: &dyn Reflect| Ok(node.to_value()));
    };

    let mut read: Read =
        Box::new(move |node: &dyn Reflect| last.select(node).map(|child| child.to_value()));

    for hop in hops {
        let next = read;
        read = Box::new(move |node: &dyn Reflect| {
            let child = hop.select(node)?;
            match child.resolve() {
                Some(child) => next(child),
                None => Err(hop.null(&hop.owner(node))),
            }
        });
    }

    read
}

fn compile_write(hops: Vec<Hop>) -> Write {
    let mut hops = hops.into_iter().rev();

    let Some(last) = hops.next() else {
        return Box::new(|node: &mut dyn Reflect, value: Value| node.assign(value));
    };

    let mut write: Write = Box::new(move |node: &mut dyn Reflect, value: Value| {
        let owner = last.owner(node);
        last.select_mut(node, &owner)?.assign(value)
    });

    for hop in hops {
        let next = write;
        write = Box::new(move |node: &mut dyn Reflect, value: Value| {
            let owner = hop.owner(node);
            let child = hop.select_mut(node, &owner)?;
            match child.resolve_mut() {
                Some(child) => next(child, value),
                None => Err(hop.null(&owner)),
            }
        });
    }

    write
}

impl fmt::Debug for CompiledGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGetter")
            .field("root", &self.root)
            .field("path", &self.path)
            .field("ty", &self.ty)
            .finish()
    }
}

impl fmt::Debug for CompiledSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSetter")
            .field("root", &self.root)
            .field("path", &self.path)
            .field("ty", &self.ty)
            .finish()
    }
}
