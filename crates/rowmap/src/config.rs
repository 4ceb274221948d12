mod def;

use crate::{
    accessor::{AccessorStrategy, Accessors},
    result_map::{Factory, ResultMapBuilder},
    statement::StatementBuilder,
    Returns, ResultMap, Statement,
};

use indexmap::IndexMap;
use rowmap_core::{Bean, Error, Result, Type, TypeHandler, TypeHandlers, Typed};

use std::{fmt, sync::Arc};

/// Every configuration-time object of a mapper: accessor strategy, type
/// handlers, bean types, result maps and statements.
///
/// Built once, then shared read-only by every call.
#[derive(Default)]
pub struct Configuration {
    accessors: Accessors,
    handlers: TypeHandlers,
    beans: IndexMap<String, BeanEntry>,
    result_maps: IndexMap<String, Arc<ResultMap>>,
    statements: IndexMap<String, Arc<Statement>>,
}

#[derive(Clone)]
struct BeanEntry {
    ty: Type,
    factory: Factory,
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration::default()
    }

    pub fn with_strategy(mut self, strategy: AccessorStrategy) -> Configuration {
        self.accessors = Accessors::new(strategy);
        self
    }

    pub fn accessors(&self) -> &Accessors {
        &self.accessors
    }

    pub fn handlers(&self) -> &TypeHandlers {
        &self.handlers
    }

    /// Registers `handler` for properties and parameters of type `ty`.
    ///
    /// Only affects result maps and statements built afterwards.
    pub fn register_handler(&mut self, ty: Type, handler: impl TypeHandler) -> &mut Self {
        self.handlers.register(ty, handler);
        self
    }

    /// Makes `B` available by name to declarative definitions.
    pub fn register_bean<B: Bean + Typed + Default>(&mut self) -> &mut Self {
        let factory: Factory = Arc::new(|| Ok(Box::new(B::default()) as Box<dyn Bean>));
        self.beans.insert(
            B::describe().name.to_string(),
            BeanEntry {
                ty: B::ty(),
                factory,
            },
        );
        self
    }

    /// Builds and registers a result map under its id.
    pub fn add_result_map(&mut self, builder: ResultMapBuilder) -> Result<Arc<ResultMap>> {
        if self.result_maps.contains_key(builder.id()) {
            return Err(Error::result_map(format!(
                "result map `{}` is already registered",
                builder.id()
            )));
        }

        let map = builder.build(self)?;
        self.result_maps.insert(map.id().to_string(), map.clone());
        Ok(map)
    }

    pub fn result_map(&self, id: &str) -> Option<&Arc<ResultMap>> {
        self.result_maps.get(id)
    }

    /// Builds and registers a statement under its name.
    pub fn add_statement(&mut self, builder: StatementBuilder) -> Result<Arc<Statement>> {
        if self.statements.contains_key(builder.name()) {
            rowmap_core::bail!("statement `{}` is already registered", builder.name());
        }

        let statement = builder.build(self)?;
        self.statements
            .insert(statement.name().to_string(), statement.clone());
        Ok(statement)
    }

    pub fn statement(&self, name: &str) -> Option<&Arc<Statement>> {
        self.statements.get(name)
    }

    pub fn statements(&self) -> impl Iterator<Item = &Arc<Statement>> + '_ {
        self.statements.values()
    }

    /// Checks references between registered objects: every subselect must
    /// name a registered statement that returns a value.
    pub fn validate(&self) -> Result<()> {
        let maps = self
            .result_maps
            .values()
            .chain(self.statements.values().filter_map(|statement| statement.returns().result_map()));

        for map in maps {
            self.validate_map(map)?;
        }

        Ok(())
    }

    fn validate_map(&self, map: &ResultMap) -> Result<()> {
        for mapping in map.mappings() {
            if let Some(nested) = mapping.nested() {
                self.validate_map(nested)?;
            }

            let Some(name) = mapping.subselect() else {
                continue;
            };

            let Some(statement) = self.statement(name) else {
                return Err(Error::result_map(format!(
                    "`{}.{}` selects from unknown statement `{name}`",
                    map.id(),
                    mapping.property()
                )));
            };

            if matches!(statement.returns(), Returns::Callback(_)) {
                return Err(Error::result_map(format!(
                    "`{}.{}` selects from `{name}`, which pushes into a caller sink",
                    map.id(),
                    mapping.property()
                )));
            }
        }

        Ok(())
    }

    /// Registers the result maps and statements of a JSON mapper document.
    ///
    /// ```json
    /// {
    ///   "result_maps": [
    ///     { "id": "post", "type": "Post", "auto": true, "group_by": ["id"],
    ///       "mappings": [{ "property": "comments", "result_map": "comment" }] }
    ///   ],
    ///   "statements": [
    ///     { "name": "findPost", "sql": "SELECT * FROM posts WHERE id = ${1}",
    ///       "params": ["i64"], "returns": "one", "result_map": "post" }
    ///   ]
    /// }
    /// ```
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let mapper: def::MapperDef = serde_json::from_str(json)
            .map_err(|err| rowmap_core::err!("invalid mapper definition: {err}"))?;

        mapper.register(self)
    }

    /// Parses a type name as used by mapper documents.
    pub fn parse_type(&self, name: &str) -> Result<Type> {
        let name = name.trim();

        let generic = |prefix: &str, suffix: &str| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix))
        };

        if let Some(inner) = generic("Option<", ">") {
            return Ok(Type::option(self.parse_type(inner)?));
        }

        if let Some(inner) = generic("Box<[", "]>") {
            return Ok(Type::array(self.parse_type(inner)?));
        }

        if let Some(inner) = generic("Vec<", ">") {
            return Ok(Type::list(self.parse_type(inner)?));
        }

        Ok(match name {
            "bool" => Type::Bool,
            "i8" => Type::I8,
            "i16" => Type::I16,
            "i32" => Type::I32,
            "i64" => Type::I64,
            "u8" => Type::U8,
            "u16" => Type::U16,
            "u32" => Type::U32,
            "u64" => Type::U64,
            "f32" => Type::F32,
            "f64" => Type::F64,
            "char" => Type::Char,
            "String" => Type::String,
            "Bytes" => Type::Bytes,
            "Value" => Type::Any,
            _ => match self.beans.get(name) {
                Some(bean) => bean.ty.clone(),
                None => return Err(Error::unsupported_type(name)),
            },
        })
    }

    fn bean(&self, name: &str) -> Option<&BeanEntry> {
        self.beans.get(name)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("strategy", &self.accessors.strategy())
            .field("beans", &self.beans.keys().collect::<Vec<_>>())
            .field("result_maps", &self.result_maps.keys().collect::<Vec<_>>())
            .field("statements", &self.statements.keys().collect::<Vec<_>>())
            .finish()
    }
}
