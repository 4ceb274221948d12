use super::{next_key, ColumnRef, Factory, PropertyMapping, ResultMap, Source, Target};
use crate::{sink::SinkKind, Configuration};

use rowmap_core::{Bean, Error, Result, Type, Typed};

use std::sync::{Arc, RwLock};

/// Declares a [`ResultMap`].
///
/// ```ignore
/// let comment = ResultMap::builder::<Comment>("comment")
///     .column("id", "comment_id")
///     .column("body", "body")
///     .build(&config)?;
///
/// let post = ResultMap::builder::<Post>("post")
///     .auto(true)
///     .nested("comments", &comment)
///     .group_by(["id"])
///     .build(&config)?;
/// ```
#[derive(Debug)]
pub struct ResultMapBuilder {
    id: String,
    ty: Type,
    target: TargetDef,
    auto: bool,
    mappings: Vec<(String, SourceDef)>,
    group_by: Vec<String>,
}

enum TargetDef {
    Bean(Factory),
    Scalar(ColumnRef),
}

#[derive(Debug)]
enum SourceDef {
    Column(ColumnRef),
    Nested(Arc<ResultMap>),
    Subselect { column: ColumnRef, statement: String },
}

impl ResultMap {
    /// Starts a map producing `B` instances created with `B::default()`.
    pub fn builder<B: Bean + Typed + Default>(id: impl Into<String>) -> ResultMapBuilder {
        let factory: Factory = Arc::new(|| Ok(Box::new(B::default()) as Box<dyn Bean>));
        ResultMap::builder_for(id, B::ty(), factory)
    }

    /// Starts a map producing beans of `ty` created by `factory`.
    pub fn builder_for(id: impl Into<String>, ty: Type, factory: Factory) -> ResultMapBuilder {
        ResultMapBuilder::new(id.into(), ty, TargetDef::Bean(factory))
    }

    /// Starts a map reading one `T` from the first column of each row.
    pub fn scalar<T: Typed>(id: impl Into<String>) -> ResultMapBuilder {
        ResultMap::scalar_for(id, T::ty())
    }

    pub fn scalar_for(id: impl Into<String>, ty: Type) -> ResultMapBuilder {
        ResultMapBuilder::new(id.into(), ty, TargetDef::Scalar(ColumnRef::Index(1)))
    }
}

impl ResultMapBuilder {
    fn new(id: String, ty: Type, target: TargetDef) -> ResultMapBuilder {
        ResultMapBuilder {
            id,
            ty,
            target,
            auto: false,
            mappings: vec![],
            group_by: vec![],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maps result columns without an explicit mapping onto properties of
    /// the same name, ignoring case.
    pub fn auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    pub fn column(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.mappings.push((
            property.into(),
            SourceDef::Column(ColumnRef::Name(column.into())),
        ));
        self
    }

    /// Maps the column at the 1-based `index`.
    pub fn column_index(mut self, property: impl Into<String>, index: usize) -> Self {
        self.mappings
            .push((property.into(), SourceDef::Column(ColumnRef::Index(index))));
        self
    }

    /// Populates `property` from the same row with `map`. List and array
    /// properties collect one element per distinct nested object.
    ///
    /// A one-to-one property whose `map` has no group-by columns is filled
    /// from the first row of its parent only. Later rows merged into the
    /// same parent leave it untouched; give `map` group-by columns to merge
    /// those rows into the child as well.
    pub fn nested(mut self, property: impl Into<String>, map: &Arc<ResultMap>) -> Self {
        self.mappings
            .push((property.into(), SourceDef::Nested(map.clone())));
        self
    }

    /// Populates `property` by running `statement` with the value of
    /// `column` as its only argument.
    pub fn subselect(
        mut self,
        property: impl Into<String>,
        column: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        self.mappings.push((
            property.into(),
            SourceDef::Subselect {
                column: ColumnRef::Name(column.into()),
                statement: statement.into(),
            },
        ));
        self
    }

    /// For scalar maps, reads `column` instead of the first column.
    pub fn scalar_column(mut self, column: impl Into<String>) -> Self {
        if let TargetDef::Scalar(scalar) = &mut self.target {
            *scalar = ColumnRef::Name(column.into());
        }
        self
    }

    /// Merges rows with equal values of these properties into one object.
    pub fn group_by<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.group_by.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Validates the declaration and resolves its accessors and type
    /// handlers.
    pub fn build(self, config: &Configuration) -> Result<Arc<ResultMap>> {
        let accessors = *config.accessors();
        let handlers = config.handlers();
        let id = self.id;
        let ty = self.ty;

        let target = match self.target {
            TargetDef::Bean(factory) => {
                if !ty.is_bean() {
                    return Err(Error::result_map(format!(
                        "result map `{id}` targets `{ty}`, which is not a bean"
                    )));
                }
                Target::Bean(factory)
            }
            TargetDef::Scalar(column) => {
                if !self.mappings.is_empty() || !self.group_by.is_empty() {
                    return Err(Error::result_map(format!(
                        "scalar result map `{id}` cannot map properties"
                    )));
                }
                check_column(&id, &column)?;
                Target::Scalar {
                    handler: handlers.handler_for(&ty)?,
                    column,
                }
            }
        };

        let mut mappings: Vec<PropertyMapping> = Vec::with_capacity(self.mappings.len());

        for (property, source) in self.mappings {
            if mappings.iter().any(|mapping| mapping.property == property) {
                return Err(Error::result_map(format!(
                    "property `{property}` is mapped twice in `{id}`"
                )));
            }

            let setter = accessors.setter(&ty, &property)?;
            let property_ty = setter.ty().clone();

            let source = match source {
                SourceDef::Column(column) => {
                    check_column(&id, &column)?;
                    Source::Column {
                        handler: handlers.handler_for(&property_ty)?,
                        column,
                    }
                }
                SourceDef::Nested(map) => {
                    let kind = SinkKind::of(&property_ty);
                    let expected = match kind {
                        SinkKind::Single => Some(property_ty.strip_option()),
                        SinkKind::List | SinkKind::Array => {
                            property_ty.strip_option().element().map(Type::strip_option)
                        }
                    };

                    if expected.is_some_and(|expected| expected != map.ty() && *expected != Type::Any) {
                        return Err(Error::result_map(format!(
                            "nested map `{}` produces `{}`, but `{id}.{property}` is `{property_ty}`",
                            map.id(),
                            map.ty()
                        )));
                    }

                    Source::Nested {
                        getter: accessors.getter(&ty, &property)?,
                        map,
                        kind,
                    }
                }
                SourceDef::Subselect { column, statement } => {
                    check_column(&id, &column)?;
                    Source::Subselect { column, statement }
                }
            };

            mappings.push(PropertyMapping {
                key: next_key(),
                property,
                ty: property_ty,
                setter,
                source,
            });
        }

        let mut group_by = Vec::with_capacity(self.group_by.len());

        for name in &self.group_by {
            let Some(index) = mappings.iter().position(|mapping| mapping.property == *name) else {
                return Err(Error::result_map(format!(
                    "group-by property `{name}` is not mapped in `{id}`"
                )));
            };

            match &mappings[index].source {
                Source::Column { .. } => group_by.push(index),
                Source::Nested { .. } => {
                    return Err(Error::result_map(format!(
                        "`{id}.{name}` cannot be both a group-by key and a nested map"
                    )))
                }
                Source::Subselect { .. } => {
                    return Err(Error::result_map(format!(
                        "group-by property `{id}.{name}` must be mapped to a column"
                    )))
                }
            }
        }

        let grouped = !group_by.is_empty()
            || mappings
                .iter()
                .filter_map(PropertyMapping::nested)
                .any(|map| map.is_grouped());

        tracing::debug!(
            id = %id,
            %ty,
            mappings = mappings.len(),
            auto = self.auto,
            grouped,
            "built result map"
        );

        Ok(Arc::new(ResultMap {
            id,
            key: next_key(),
            ty,
            target,
            mappings,
            group_by,
            auto: self.auto,
            auto_mappings: RwLock::new(None),
            grouped,
            accessors,
            handlers: handlers.clone(),
        }))
    }
}

fn check_column(id: &str, column: &ColumnRef) -> Result<()> {
    match column {
        ColumnRef::Index(0) => Err(Error::result_map(format!(
            "column indexes start at 1 in `{id}`"
        ))),
        ColumnRef::Name(name) if name.is_empty() => Err(Error::result_map(format!(
            "empty column name in `{id}`"
        ))),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for TargetDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetDef::Bean(_) => f.write_str("Bean"),
            TargetDef::Scalar(column) => f.debug_tuple("Scalar").field(column).finish(),
        }
    }
}
