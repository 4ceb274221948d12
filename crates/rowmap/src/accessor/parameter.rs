use super::{Accessors, Getter};

use rowmap_core::{resolve, Error, PropertyPath, Result, Type, Value};

use std::sync::Arc;

/// Reads a value out of a call's argument list.
///
/// The first step of the path selects the argument (`value` or a 1-based
/// ordinal); the rest navigates into it like a regular getter.
#[derive(Debug)]
pub struct ParameterGetter {
    path: PropertyPath,
    slot: usize,
    ty: Type,
    rest: Option<Arc<dyn Getter>>,
}

impl ParameterGetter {
    pub(super) fn new(accessors: &Accessors, params: &[Type], path: PropertyPath) -> Result<ParameterGetter> {
        let (slot, slot_ty) = resolve::parameter_slot_type(params, &path)?;

        let rest = match path.len() {
            1 => None,
            _ => Some(accessors.build_getter(slot_ty, path.tail(1))?),
        };

        let ty = match &rest {
            Some(rest) => rest.ty().clone(),
            None => slot_ty.clone(),
        };

        Ok(ParameterGetter {
            path,
            slot,
            ty,
            rest,
        })
    }

    /// Reads the addressed value from `args`.
    pub fn get(&self, args: &[Value]) -> Result<Value> {
        let arg = args.get(self.slot).ok_or_else(|| {
            Error::introspection(format!(
                "parameter `{}` is out of range; {} argument(s) supplied",
                self.path.prefix(1),
                args.len()
            ))
        })?;

        match &self.rest {
            Some(rest) => rest.get(arg),
            None => Ok(arg.clone()),
        }
    }

    /// Declared type of the addressed value.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Zero-based index of the argument the path starts from.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }
}
