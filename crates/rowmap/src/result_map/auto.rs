use super::{next_key, ColumnRef, PropertyMapping, ResultMap, Source, Target};

use rowmap_core::{driver::Column, resolve, Error, Result};

use std::sync::{Arc, PoisonError};

impl ResultMap {
    /// Mappings derived from the column metadata of a result set.
    ///
    /// Resolved on first use and memoized for the lifetime of the map; later
    /// result sets reuse the first resolution.
    pub(crate) fn auto_mappings(&self, columns: &[Column]) -> Result<Arc<[PropertyMapping]>> {
        self.auto_mappings_within(columns, &[])
    }

    /// Like [`ResultMap::auto_mappings`], for a map nested in maps that
    /// already read the `enclosing` columns.
    pub(crate) fn auto_mappings_within(
        &self,
        columns: &[Column],
        enclosing: &[&ColumnRef],
    ) -> Result<Arc<[PropertyMapping]>> {
        if !self.auto {
            return Ok(Vec::new().into());
        }

        if let Some(resolved) = &*self.auto_mappings.read().unwrap_or_else(PoisonError::into_inner) {
            return Ok(resolved.clone());
        }

        let mut slot = self
            .auto_mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(resolved) = &*slot {
            return Ok(resolved.clone());
        }

        let resolved: Arc<[PropertyMapping]> = self.resolve_auto(columns, enclosing)?.into();

        tracing::debug!(
            id = %self.id,
            ty = %self.ty,
            columns = columns.len(),
            mappings = resolved.len(),
            "resolved auto mappings"
        );

        *slot = Some(resolved.clone());
        Ok(resolved)
    }

    fn resolve_auto(
        &self,
        columns: &[Column],
        enclosing: &[&ColumnRef],
    ) -> Result<Vec<PropertyMapping>> {
        let Some(bean) = self.ty.as_bean() else {
            return Ok(vec![]);
        };

        let mut covered = enclosing.to_vec();
        self.explicit_columns(&mut covered);

        let mut mappings = vec![];

        for column in columns {
            if covered.iter().any(|explicit| explicit.matches(column)) {
                continue;
            }

            let Some(property) = resolve::property_ignore_case(bean, &column.name)? else {
                return Err(Error::result_map(format!(
                    "column `{}` has no matching property on `{}`",
                    column.name, self.ty
                )));
            };

            let explicit = self
                .mappings
                .iter()
                .chain(&mappings)
                .any(|mapping| mapping.property == property.name);

            if explicit {
                continue;
            }

            let setter = self.accessors.setter(&self.ty, property.name)?;
            let handler = self.handlers.handler_for(setter.ty())?;

            mappings.push(PropertyMapping {
                key: next_key(),
                property: property.name.to_string(),
                ty: setter.ty().clone(),
                setter,
                source: Source::Column {
                    column: ColumnRef::Name(column.name.clone()),
                    handler,
                },
            });
        }

        Ok(mappings)
    }

    /// Columns read by explicit mappings of this map and its nested maps.
    pub(super) fn explicit_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        if let Target::Scalar { column, .. } = &self.target {
            out.push(column);
        }

        for mapping in &self.mappings {
            match &mapping.source {
                Source::Column { column, .. } | Source::Subselect { column, .. } => out.push(column),
                Source::Nested { map, .. } => map.explicit_columns(out),
            }
        }
    }
}
