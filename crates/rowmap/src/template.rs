//! Statement templates with `${path}` parameter and `#{name(column)}` column
//! placeholders.

use crate::accessor::{Accessors, ParameterGetter};

use rowmap_core::{driver::operation::QuerySql, Error, Result, Type, TypeHandler, TypeHandlers, Value};

use std::sync::Arc;

/// A template bound to the parameter types of a statement.
///
/// Binding resolves every `${..}` placeholder to a parameter getter and a
/// type handler; the compiled SQL has a `?` marker in its place. `#{..}`
/// placeholders are replaced by their column token and recorded as
/// property/column pairs.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    sql: String,
    params: Vec<BoundParam>,
    columns: Vec<ColumnBinding>,
}

#[derive(Debug, Clone)]
struct BoundParam {
    getter: Arc<ParameterGetter>,
    handler: Arc<dyn TypeHandler>,
}

/// A `#{name(column)}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub property: String,
    pub column: String,
}

/// SQL text and the parameter values for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSql {
    pub sql: String,

    /// Values with their declared types, in marker order.
    pub params: Vec<(Value, Type)>,
}

#[derive(Debug, PartialEq)]
enum Piece<'a> {
    Text(&'a str),
    Param(&'a str),
    Column { property: &'a str, column: &'a str },
}

impl Template {
    /// Parses `source` and resolves its parameter placeholders against
    /// `params`.
    pub fn bind(
        source: &str,
        params: &[Type],
        accessors: &Accessors,
        handlers: &TypeHandlers,
    ) -> Result<Template> {
        let mut sql = String::with_capacity(source.len());
        let mut bound = vec![];
        let mut columns = vec![];

        for piece in scan(source)? {
            match piece {
                Piece::Text(text) => sql.push_str(text),
                Piece::Param(path) => {
                    let getter = accessors.parameter(params, path)?;
                    let handler = handlers.handler_for(getter.ty())?;
                    bound.push(BoundParam { getter, handler });
                    sql.push('?');
                }
                Piece::Column { property, column } => {
                    columns.push(ColumnBinding {
                        property: property.to_string(),
                        column: column.to_string(),
                    });
                    sql.push_str(column);
                }
            }
        }

        Ok(Template {
            source: source.to_string(),
            sql,
            params: bound,
            columns,
        })
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled SQL with `?` markers.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn columns(&self) -> &[ColumnBinding] {
        &self.columns
    }

    /// Declared types of the parameters in marker order.
    pub fn param_types(&self) -> impl ExactSizeIterator<Item = &Type> + '_ {
        self.params.iter().map(|param| param.getter.ty())
    }

    /// Reads every parameter out of `args`.
    pub fn apply(&self, args: &[Value]) -> Result<BoundSql> {
        let params = self
            .params
            .iter()
            .map(|param| Ok((param.getter.get(args)?, param.getter.ty().clone())))
            .collect::<Result<_>>()?;

        Ok(BoundSql {
            sql: self.sql.clone(),
            params,
        })
    }

    /// Builds the driver operation for `args`, writing each parameter
    /// through its type handler.
    pub fn query(&self, args: &[Value]) -> Result<QuerySql> {
        let mut query = QuerySql::new(self.sql.clone());

        for (i, param) in self.params.iter().enumerate() {
            param
                .handler
                .write_parameter(&mut query, i + 1, param.getter.get(args)?)?;
        }

        Ok(query)
    }
}

fn scan(source: &str) -> Result<Vec<Piece<'_>>> {
    let bytes = source.as_bytes();
    let mut pieces = vec![];
    let mut text_start = 0;
    let mut pos = 0;

    while pos + 1 < bytes.len() {
        let marker = bytes[pos];

        if !matches!(marker, b'$' | b'#') || bytes[pos + 1] != b'{' {
            pos += 1;
            continue;
        }

        let body_start = pos + 2;
        let Some(len) = source[body_start..].find('}') else {
            return Err(Error::invalid_template(source, pos, "unterminated placeholder"));
        };

        let body = source[body_start..body_start + len].trim();
        if body.is_empty() {
            return Err(Error::invalid_template(source, pos, "empty placeholder"));
        }

        if text_start < pos {
            pieces.push(Piece::Text(&source[text_start..pos]));
        }

        pieces.push(match marker {
            b'$' => Piece::Param(body),
            _ => column(source, pos, body)?,
        });

        pos = body_start + len + 1;
        text_start = pos;
    }

    if text_start < source.len() {
        pieces.push(Piece::Text(&source[text_start..]));
    }

    Ok(pieces)
}

/// Splits `name(column)`; a bare `name` is its own column.
fn column<'a>(source: &str, pos: usize, body: &'a str) -> Result<Piece<'a>> {
    let Some((property, rest)) = body.split_once('(') else {
        return Ok(Piece::Column {
            property: body,
            column: body,
        });
    };

    let (property, column) = match rest.strip_suffix(')') {
        Some(column) => (property.trim(), column.trim()),
        None => {
            return Err(Error::invalid_template(
                source,
                pos,
                "expected `)` closing the column name",
            ))
        }
    };

    if property.is_empty() || column.is_empty() {
        return Err(Error::invalid_template(
            source,
            pos,
            "column placeholder needs both a property and a column",
        ));
    }

    Ok(Piece::Column { property, column })
}
