use crate::{template::Template, Configuration, ResultMap};

use rowmap_core::{Result, Type};

use std::sync::Arc;

/// A named statement: a bound template plus what its execution returns.
#[derive(Debug)]
pub struct Statement {
    name: String,
    template: Template,
    returns: Returns,
}

/// How the result of a statement reaches the caller.
#[derive(Debug, Clone)]
pub enum Returns {
    /// The number of affected rows.
    Count,

    /// At most one mapped value; more rows fail with a multiple-results
    /// error.
    One(Arc<ResultMap>),

    /// Every mapped value, in order.
    List(Arc<ResultMap>),

    /// Every mapped value, cast to the map's type once the cursor is drained.
    Array(Arc<ResultMap>),

    /// Mapped values are pushed into a caller-supplied sink.
    Callback(Arc<ResultMap>),
}

#[derive(Debug)]
pub struct StatementBuilder {
    name: String,
    sql: String,
    params: Vec<Type>,
    returns: Returns,
}

impl Statement {
    pub fn builder(name: impl Into<String>, sql: impl Into<String>) -> StatementBuilder {
        StatementBuilder {
            name: name.into(),
            sql: sql.into(),
            params: vec![],
            returns: Returns::Count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn returns(&self) -> &Returns {
        &self.returns
    }
}

impl Returns {
    pub fn result_map(&self) -> Option<&Arc<ResultMap>> {
        match self {
            Returns::Count => None,
            Returns::One(map) | Returns::List(map) | Returns::Array(map) | Returns::Callback(map) => {
                Some(map)
            }
        }
    }
}

impl StatementBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares the types of the positional arguments.
    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = Type>,
    {
        self.params = params.into_iter().collect();
        self
    }

    pub fn returns(mut self, returns: Returns) -> Self {
        self.returns = returns;
        self
    }

    /// Binds the template against the declared parameter types.
    pub fn build(self, config: &Configuration) -> Result<Arc<Statement>> {
        let template = Template::bind(&self.sql, &self.params, config.accessors(), config.handlers())
            .map_err(|err| err.context(rowmap_core::err!("statement `{}`", self.name)))?;

        tracing::debug!(
            name = %self.name,
            sql = template.sql(),
            params = template.param_types().len(),
            "built statement"
        );

        Ok(Arc::new(Statement {
            name: self.name,
            template,
            returns: self.returns,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::fixtures::Publication;
    use pretty_assertions::assert_eq;
    use rowmap_core::{Typed, Value};

    #[test]
    fn build_binds_the_template() {
        let config = Configuration::default();
        let map = ResultMap::builder::<Publication>("publication")
            .auto(true)
            .build(&config)
            .unwrap();

        let statement = Statement::builder("findPublication", "SELECT * FROM pubs WHERE id = ${1}")
            .params([Type::I64])
            .returns(Returns::One(map.clone()))
            .build(&config)
            .unwrap();

        assert_eq!(statement.name(), "findPublication");
        assert_eq!(statement.template().sql(), "SELECT * FROM pubs WHERE id = ?");
        assert!(Arc::ptr_eq(statement.returns().result_map().unwrap(), &map));

        let query = statement.template().query(&[Value::I64(5)]).unwrap();
        assert_eq!(query.params[0].value, Value::I64(5));
    }

    #[test]
    fn template_errors_name_the_statement() {
        let err = Statement::builder("broken", "SELECT ${1.nope}")
            .params([Publication::ty()])
            .build(&Configuration::default())
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(err
            .to_string()
            .starts_with("statement `broken`: introspection failed"));
    }
}
