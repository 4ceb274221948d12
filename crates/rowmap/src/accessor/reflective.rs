use super::{check_root, expected, walk, Getter, Setter};

use rowmap_core::{resolve, BeanDescriptor, PropertyPath, Reflect, Result, Type, Value};

/// Walks the path by name on every read.
#[derive(Debug)]
pub(super) struct ReflectiveGetter {
    root: Type,
    expected: Option<&'static BeanDescriptor>,
    path: PropertyPath,
    ty: Type,
}

impl ReflectiveGetter {
    pub(super) fn new(root: &Type, path: PropertyPath) -> Result<ReflectiveGetter> {
        let ty = resolve::property_type(root, &path)?;

        Ok(ReflectiveGetter {
            root: root.clone(),
            expected: expected(root),
            path,
            ty,
        })
    }
}

impl Getter for ReflectiveGetter {
    fn get(&self, root: &dyn Reflect) -> Result<Value> {
        let node = walk::root(root, &self.path, &self.root)?;
        check_root(self.expected, &self.root, node)?;
        walk::read(node, &self.path, &self.root)
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn path(&self) -> &PropertyPath {
        &self.path
    }
}

/// Walks the path by name on every write.
#[derive(Debug)]
pub(super) struct ReflectiveSetter {
    root: Type,
    expected: Option<&'static BeanDescriptor>,
    path: PropertyPath,
    ty: Type,
}

impl ReflectiveSetter {
    pub(super) fn new(root: &Type, path: PropertyPath) -> Result<ReflectiveSetter> {
        let walk = resolve::walk(root, &path)?;
        super::check_writable(&walk, &path)?;

        Ok(ReflectiveSetter {
            root: root.clone(),
            expected: expected(root),
            path,
            ty: walk.ty,
        })
    }
}

impl Setter for ReflectiveSetter {
    fn set(&self, root: &mut dyn Reflect, value: Value) -> Result<()> {
        let node = walk::root_mut(root, &self.path, &self.root)?;
        check_root(self.expected, &self.root, node)?;
        walk::write(node, &self.path, &self.root, value)
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn path(&self) -> &PropertyPath {
        &self.path
    }
}
