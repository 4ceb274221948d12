use crate::{
    driver::{operation::QuerySql, RowRef},
    Error, Result, Type, Value,
};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Storage type reported to the driver along with a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    Integer,
    Real,
    Text,
    Blob,

    /// Unknown or dynamic; the driver decides from the value.
    Any,
}

/// Converts between column values and property values of one type.
pub trait TypeHandler: fmt::Debug + Send + Sync + 'static {
    fn sql_type(&self) -> SqlType;

    /// Reads the column at the 1-based `index`.
    fn read_by_index(&self, row: &RowRef<'_>, index: usize) -> Result<Value>;

    /// Reads the column named `name`, ignoring ASCII case.
    fn read_by_name(&self, row: &RowRef<'_>, name: &str) -> Result<Value> {
        let index = row.index_of(name).ok_or_else(|| {
            Error::result_map(format!("column `{name}` is not present in the result set"))
        })?;
        self.read_by_index(row, index)
    }

    /// Binds `value` as the parameter at the 1-based `index`.
    fn write_parameter(&self, stmt: &mut QuerySql, index: usize, value: Value) -> Result<()>;
}

/// Handler for types the driver can represent directly. Values are cast to
/// the handler's type on the way in and out; null passes through.
#[derive(Debug, Clone)]
pub struct ScalarHandler {
    ty: Type,
    sql_type: SqlType,
}

impl ScalarHandler {
    pub fn new(ty: Type, sql_type: SqlType) -> ScalarHandler {
        ScalarHandler { ty, sql_type }
    }
}

impl TypeHandler for ScalarHandler {
    fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    fn read_by_index(&self, row: &RowRef<'_>, index: usize) -> Result<Value> {
        row.get(index)?.clone().cast(&self.ty)
    }

    fn write_parameter(&self, stmt: &mut QuerySql, index: usize, value: Value) -> Result<()> {
        stmt.bind(index, value.cast(&self.ty)?, self.sql_type);
        Ok(())
    }
}

/// Registry of type handlers keyed by property type.
#[derive(Debug, Clone)]
pub struct TypeHandlers {
    handlers: IndexMap<Type, Arc<dyn TypeHandler>>,
}

impl TypeHandlers {
    /// A registry without any handler.
    pub fn empty() -> TypeHandlers {
        TypeHandlers {
            handlers: IndexMap::new(),
        }
    }

    pub fn register(&mut self, ty: Type, handler: impl TypeHandler) -> &mut Self {
        self.handlers.insert(ty, Arc::new(handler));
        self
    }

    /// Looks up the handler for `ty`. Nullable types share the handler of
    /// their inner type.
    pub fn handler_for(&self, ty: &Type) -> Result<Arc<dyn TypeHandler>> {
        self.handlers
            .get(ty.strip_option())
            .cloned()
            .ok_or_else(|| Error::unsupported_type(ty))
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.handlers.contains_key(ty.strip_option())
    }
}

impl Default for TypeHandlers {
    fn default() -> TypeHandlers {
        let mut handlers = TypeHandlers::empty();

        for (ty, sql_type) in [
            (Type::Bool, SqlType::Boolean),
            (Type::I8, SqlType::Integer),
            (Type::I16, SqlType::Integer),
            (Type::I32, SqlType::Integer),
            (Type::I64, SqlType::Integer),
            (Type::U8, SqlType::Integer),
            (Type::U16, SqlType::Integer),
            (Type::U32, SqlType::Integer),
            (Type::U64, SqlType::Integer),
            (Type::F32, SqlType::Real),
            (Type::F64, SqlType::Real),
            (Type::Char, SqlType::Text),
            (Type::String, SqlType::Text),
            (Type::Bytes, SqlType::Blob),
            (Type::Any, SqlType::Any),
        ] {
            handlers.register(ty.clone(), ScalarHandler::new(ty, sql_type));
        }

        // `Vec<u8>` and `Box<[u8]>` properties are stored as blobs.
        for ty in [Type::list(Type::U8), Type::array(Type::U8)] {
            handlers.register(ty, ScalarHandler::new(Type::Bytes, SqlType::Blob));
        }

        handlers
    }
}
