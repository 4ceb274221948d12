//! Serde definitions of JSON mapper documents.

use super::Configuration;
use crate::{statement::Returns, ResultMap, Statement};

use rowmap_core::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct MapperDef {
    #[serde(default)]
    result_maps: Vec<ResultMapDef>,

    #[serde(default)]
    statements: Vec<StatementDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResultMapDef {
    id: String,

    /// A registered bean name or a scalar type name.
    #[serde(rename = "type")]
    ty: String,

    #[serde(default)]
    auto: bool,

    #[serde(default)]
    group_by: Vec<String>,

    #[serde(default)]
    mappings: Vec<MappingDef>,

    /// Column read by a scalar map; the first column when absent.
    #[serde(default)]
    column: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingDef {
    property: String,

    #[serde(default)]
    column: Option<String>,

    #[serde(default)]
    column_index: Option<usize>,

    #[serde(default)]
    result_map: Option<String>,

    /// Statement run with the value of `column`.
    #[serde(default)]
    select: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatementDef {
    name: String,
    sql: String,

    #[serde(default)]
    params: Vec<String>,

    #[serde(default)]
    returns: ReturnsDef,

    #[serde(default)]
    result_map: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReturnsDef {
    #[default]
    Count,
    One,
    List,
    Array,
    Callback,
}

impl MapperDef {
    /// Registers result maps in document order, then statements. A nested
    /// map must be defined before the map that uses it.
    pub(super) fn register(self, config: &mut Configuration) -> Result<()> {
        for def in self.result_maps {
            let id = def.id.clone();
            def.register(config)
                .map_err(|err| err.context(rowmap_core::err!("result map `{id}`")))?;
        }

        for def in self.statements {
            let name = def.name.clone();
            def.register(config)
                .map_err(|err| err.context(rowmap_core::err!("statement `{name}`")))?;
        }

        Ok(())
    }
}

impl ResultMapDef {
    fn register(self, config: &mut Configuration) -> Result<()> {
        let mut builder = match config.bean(&self.ty) {
            Some(bean) => ResultMap::builder_for(self.id, bean.ty.clone(), bean.factory.clone()),
            None => {
                let ty = config.parse_type(&self.ty)?;
                let mut builder = ResultMap::scalar_for(self.id, ty);
                if let Some(column) = self.column {
                    builder = builder.scalar_column(column);
                }
                builder
            }
        };

        builder = builder.auto(self.auto);

        for mapping in self.mappings {
            builder = match mapping {
                MappingDef {
                    property,
                    column: Some(column),
                    column_index: None,
                    result_map: None,
                    select: None,
                } => builder.column(property, column),
                MappingDef {
                    property,
                    column: None,
                    column_index: Some(index),
                    result_map: None,
                    select: None,
                } => builder.column_index(property, index),
                MappingDef {
                    property,
                    column: None,
                    column_index: None,
                    result_map: Some(id),
                    select: None,
                } => {
                    let Some(nested) = config.result_map(&id) else {
                        return Err(Error::result_map(format!(
                            "`{property}` nests unknown result map `{id}`"
                        )));
                    };
                    builder.nested(property, nested)
                }
                MappingDef {
                    property,
                    column: Some(column),
                    column_index: None,
                    result_map: None,
                    select: Some(statement),
                } => builder.subselect(property, column, statement),
                MappingDef { property, .. } => {
                    return Err(Error::result_map(format!(
                        "`{property}` needs exactly one of `column`, `column_index` or \
                         `result_map`, or `column` with `select`"
                    )))
                }
            };
        }

        config.add_result_map(builder.group_by(self.group_by))?;
        Ok(())
    }
}

impl StatementDef {
    fn register(self, config: &mut Configuration) -> Result<()> {
        let params = self
            .params
            .iter()
            .map(|name| config.parse_type(name))
            .collect::<Result<Vec<_>>>()?;

        let map = match (self.returns, &self.result_map) {
            (ReturnsDef::Count, None) => None,
            (ReturnsDef::Count, Some(_)) => {
                return Err(Error::result_map(
                    "statements returning a count take no result map",
                ))
            }
            (_, None) => {
                return Err(Error::result_map("statements returning rows need a result map"))
            }
            (_, Some(id)) => match config.result_map(id) {
                Some(map) => Some(map.clone()),
                None => return Err(Error::result_map(format!("unknown result map `{id}`"))),
            },
        };

        let returns = match (self.returns, map) {
            (ReturnsDef::One, Some(map)) => Returns::One(map),
            (ReturnsDef::List, Some(map)) => Returns::List(map),
            (ReturnsDef::Array, Some(map)) => Returns::Array(map),
            (ReturnsDef::Callback, Some(map)) => Returns::Callback(map),
            _ => Returns::Count,
        };

        config.add_statement(
            Statement::builder(self.name, self.sql)
                .params(params)
                .returns(returns),
        )?;
        Ok(())
    }
}
