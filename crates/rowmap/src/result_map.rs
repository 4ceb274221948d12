//! Result maps: how the columns of a row populate an object graph.

mod auto;

mod builder;
pub use builder::ResultMapBuilder;

mod group_key;
pub(crate) use group_key::GroupKey;

use crate::{
    accessor::{Accessors, Getter, Setter},
    sink::SinkKind,
};

use rowmap_core::{
    driver::{Column, RowRef},
    Bean, Error, Result, Type, TypeHandler, TypeHandlers, Value,
};

use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

/// Creates empty instances of a result map's bean type.
pub type Factory = Arc<dyn Fn() -> Result<Box<dyn Bean>> + Send + Sync>;

/// A named, reusable column-to-property binding.
///
/// Built once through [`ResultMapBuilder`] and shared read-only afterwards.
/// The only mutable part is the auto-mapping list, resolved from the column
/// metadata of the first result set the map sees.
#[derive(Debug)]
pub struct ResultMap {
    id: String,

    /// Identity of this map within a mapping request.
    key: usize,

    ty: Type,
    target: Target,
    mappings: Vec<PropertyMapping>,

    /// Indexes into `mappings`.
    group_by: Vec<usize>,

    auto: bool,
    auto_mappings: RwLock<Option<Arc<[PropertyMapping]>>>,

    /// This map or a nested one has group-by keys.
    grouped: bool,

    accessors: Accessors,
    handlers: TypeHandlers,
}

pub(crate) enum Target {
    Bean(Factory),
    Scalar {
        handler: Arc<dyn TypeHandler>,
        column: ColumnRef,
    },
}

/// A column addressed by name (case-insensitive) or 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

/// Binds one property of a result map to its source.
#[derive(Debug, Clone)]
pub struct PropertyMapping {
    /// Identity of this mapping within a mapping request.
    key: usize,

    property: String,

    /// Declared type of the property.
    ty: Type,

    setter: Arc<dyn Setter>,
    source: Source,
}

#[derive(Debug, Clone)]
pub(crate) enum Source {
    Column {
        column: ColumnRef,
        handler: Arc<dyn TypeHandler>,
    },
    Nested {
        map: Arc<ResultMap>,
        kind: SinkKind,
        getter: Arc<dyn Getter>,
    },
    Subselect {
        column: ColumnRef,
        statement: String,
    },
}

fn next_key() -> usize {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

impl ResultMap {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type of the values this map produces.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.target, Target::Scalar { .. })
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Returns `true` if this map or any nested map groups rows.
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Explicitly declared mappings.
    pub fn mappings(&self) -> &[PropertyMapping] {
        &self.mappings
    }

    /// Names of the group-by properties.
    pub fn group_by(&self) -> impl Iterator<Item = &str> + '_ {
        self.group_by
            .iter()
            .map(|index| self.mappings[*index].property())
    }

    /// Mappings derived by auto-mapping, if they were resolved already.
    pub fn resolved_auto_mappings(&self) -> Option<Arc<[PropertyMapping]>> {
        self.auto_mappings
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn key(&self) -> usize {
        self.key
    }

    /// Returns `true` if this map itself declares group-by properties.
    pub(crate) fn has_group_by(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub(crate) fn target(&self) -> &Target {
        &self.target
    }

    /// Resolves the auto mappings of this map and of every nested map
    /// against a result set's columns.
    pub(crate) fn prepare(&self, columns: &[Column]) -> Result<()> {
        self.prepare_within(columns, &[])
    }

    /// Nested maps see the columns read by every enclosing map as covered.
    fn prepare_within(&self, columns: &[Column], enclosing: &[&ColumnRef]) -> Result<()> {
        let auto = self.auto_mappings_within(columns, enclosing)?;

        let mut covered = enclosing.to_vec();
        self.explicit_columns(&mut covered);
        covered.extend(auto.iter().filter_map(|mapping| match &mapping.source {
            Source::Column { column, .. } => Some(column),
            _ => None,
        }));

        for mapping in &self.mappings {
            if let Source::Nested { map, .. } = &mapping.source {
                map.prepare_within(columns, &covered)?;
            }
        }

        Ok(())
    }

    pub(crate) fn instantiate(&self) -> Result<Box<dyn Bean>> {
        match &self.target {
            Target::Bean(factory) => {
                factory().map_err(|err| Error::mapping(self.ty.to_string(), err.to_string()))
            }
            Target::Scalar { .. } => Err(Error::mapping(
                self.ty.to_string(),
                "scalar result maps do not create objects",
            )),
        }
    }

    /// The group key of `row`, or `None` when the map has no group-by
    /// properties.
    pub(crate) fn group_key(&self, row: &RowRef<'_>) -> Result<Option<GroupKey>> {
        if self.group_by.is_empty() {
            return Ok(None);
        }

        self.group_by
            .iter()
            .map(|index| match &self.mappings[*index].source {
                Source::Column { column, handler } => column.read(handler.as_ref(), row),
                _ => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>>>()
            .map(|values| Some(GroupKey::new(values)))
    }
}

impl Target {
    fn describe(&self) -> &'static str {
        match self {
            Target::Bean(_) => "bean",
            Target::Scalar { .. } => "scalar",
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Scalar { column, .. } => f
                .debug_struct("Scalar")
                .field("column", column)
                .finish(),
            target => f.write_str(target.describe()),
        }
    }
}

impl ColumnRef {
    pub(crate) fn read(&self, handler: &dyn TypeHandler, row: &RowRef<'_>) -> Result<Value> {
        match self {
            ColumnRef::Name(name) => handler.read_by_name(row, name),
            ColumnRef::Index(index) => handler.read_by_index(row, *index),
        }
    }

    /// The untyped value of this column in `row`.
    pub(crate) fn raw<'a>(&self, row: &RowRef<'a>) -> Result<&'a Value> {
        match self {
            ColumnRef::Name(name) => {
                let index = row.index_of(name).ok_or_else(|| {
                    Error::result_map(format!("column `{name}` is not present in the result set"))
                })?;
                row.get(index)
            }
            ColumnRef::Index(index) => row.get(*index),
        }
    }

    fn matches(&self, column: &Column) -> bool {
        match self {
            ColumnRef::Name(name) => name.eq_ignore_ascii_case(&column.name),
            ColumnRef::Index(index) => *index == column.index,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => f.write_str(name),
            ColumnRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl PropertyMapping {
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Declared type of the property.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// The column read by a column or subselect mapping.
    pub fn column(&self) -> Option<&ColumnRef> {
        match &self.source {
            Source::Column { column, .. } | Source::Subselect { column, .. } => Some(column),
            Source::Nested { .. } => None,
        }
    }

    pub fn nested(&self) -> Option<&Arc<ResultMap>> {
        match &self.source {
            Source::Nested { map, .. } => Some(map),
            _ => None,
        }
    }

    /// Name of the statement run by a subselect mapping.
    pub fn subselect(&self) -> Option<&str> {
        match &self.source {
            Source::Subselect { statement, .. } => Some(statement),
            _ => None,
        }
    }

    pub(crate) fn key(&self) -> usize {
        self.key
    }

    pub(crate) fn setter(&self) -> &Arc<dyn Setter> {
        &self.setter
    }

    pub(crate) fn source(&self) -> &Source {
        &self.source
    }
}
