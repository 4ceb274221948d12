mod session;
pub use session::Session;

use crate::{sink::Sink, Configuration, Statement};

use rowmap_core::{driver::Driver, Error, Field, Result, Value};

use std::sync::Arc;

/// A database handle: a driver plus the configuration every call runs
/// against. Cloning is cheap.
///
/// Each call on `Db` opens its own connection through the driver. Use a
/// [`Session`] to run several statements on one connection or inside a
/// transaction.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    driver: Arc<dyn Driver>,
    config: Configuration,
}

impl Db {
    /// Validates `config` and wraps `driver`.
    pub fn new(driver: impl Driver, config: Configuration) -> Result<Db> {
        config.validate()?;

        tracing::debug!(
            statements = config.statements().count(),
            strategy = ?config.accessors().strategy(),
            "database handle ready"
        );

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Arc::new(driver),
                config,
            }),
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.shared.config
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// Opens a connection.
    pub async fn session(&self) -> Result<Session> {
        let connection = self.shared.driver.connect().await?;
        Ok(Session::new(self.clone(), connection))
    }

    /// Runs the statement named `statement`; see [`Session::exec`].
    pub async fn exec(&self, statement: &str, args: Vec<Value>) -> Result<Value> {
        self.session().await?.exec(statement, args).await
    }

    /// Runs the statement named `statement`, pushing every mapped value into
    /// `sink`.
    pub async fn exec_into(
        &self,
        statement: &str,
        args: Vec<Value>,
        sink: &mut dyn Sink,
    ) -> Result<()> {
        self.session()
            .await?
            .exec_into(statement, args, sink)
            .await
    }

    pub async fn one<T: Field>(&self, statement: &str, args: Vec<Value>) -> Result<Option<T>> {
        self.session().await?.one(statement, args).await
    }

    pub async fn list<T: Field>(&self, statement: &str, args: Vec<Value>) -> Result<Vec<T>> {
        self.session().await?.list(statement, args).await
    }

    pub async fn array<T: Field>(&self, statement: &str, args: Vec<Value>) -> Result<Box<[T]>> {
        self.session().await?.array(statement, args).await
    }

    fn statement(&self, name: &str) -> Result<Arc<Statement>> {
        self.shared
            .config
            .statement(name)
            .cloned()
            .ok_or_else(|| Error::mapping(name, "no statement with this name is registered"))
    }
}

/// Builds the argument list of a statement call.
///
/// ```ignore
/// db.exec("findPost", args![42_i64, "draft"]).await?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ( $( $arg:expr ),+ $(,)? ) => {
        ::std::vec![ $( $crate::Value::from($arg) ),+ ]
    };
}
