use super::Operation;

use crate::{SqlType, Value};

/// A SQL statement with `?` markers and the values bound to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySql {
    pub sql: String,

    /// Parameters in marker order.
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub value: Value,
    pub ty: SqlType,
}

impl QuerySql {
    pub fn new(sql: impl Into<String>) -> QuerySql {
        QuerySql {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// Binds the parameter at the 1-based `index`. Unbound positions before
    /// it are filled with null.
    pub fn bind(&mut self, index: usize, value: Value, ty: SqlType) {
        let position = index.saturating_sub(1);

        if self.params.len() <= position {
            self.params.resize(
                position + 1,
                Param {
                    value: Value::Null,
                    ty: SqlType::Any,
                },
            );
        }

        self.params[position] = Param { value, ty };
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
