use super::Db;
use crate::{
    engine::{self, Cx},
    sink::Sink,
};

use rowmap_core::{
    driver::operation::Transaction, Connection, Error, Field, Result, Value,
};

use std::fmt;

/// One connection taken from the driver.
///
/// Statements run on a session share its connection, including the
/// subselects they trigger. Dropping the session releases the connection.
pub struct Session {
    db: Db,
    connection: Box<dyn Connection>,
}

impl Session {
    pub(super) fn new(db: Db, connection: Box<dyn Connection>) -> Session {
        Session { db, connection }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Runs the statement named `statement` and returns what it declares:
    /// the update count, the single mapped value (null when no row
    /// matched), or the list of mapped values.
    pub async fn exec(&mut self, statement: &str, args: Vec<Value>) -> Result<Value> {
        let statement = self.db.statement(statement)?;
        let mut cx = Cx::new(&mut *self.connection, self.db.config());
        engine::execute(&mut cx, &statement, &args).await
    }

    /// Runs the statement named `statement`, pushing every mapped value into
    /// `sink` and committing it after the last row.
    pub async fn exec_into(
        &mut self,
        statement: &str,
        args: Vec<Value>,
        sink: &mut dyn Sink,
    ) -> Result<()> {
        let statement = self.db.statement(statement)?;
        let mut cx = Cx::new(&mut *self.connection, self.db.config());
        engine::execute_into(&mut cx, &statement, &args, sink).await
    }

    pub async fn one<T: Field>(&mut self, statement: &str, args: Vec<Value>) -> Result<Option<T>> {
        match self.exec(statement, args).await? {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }

    pub async fn list<T: Field>(&mut self, statement: &str, args: Vec<Value>) -> Result<Vec<T>> {
        into_items(statement, self.exec(statement, args).await?)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    pub async fn array<T: Field>(
        &mut self,
        statement: &str,
        args: Vec<Value>,
    ) -> Result<Box<[T]>> {
        into_items(statement, self.exec(statement, args).await?)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    pub async fn begin(&mut self) -> Result<()> {
        self.transaction(Transaction::Start).await
    }

    pub async fn commit(&mut self) -> Result<()> {
        self.transaction(Transaction::Commit).await
    }

    pub async fn rollback(&mut self) -> Result<()> {
        self.transaction(Transaction::Rollback).await
    }

    async fn transaction(&mut self, op: Transaction) -> Result<()> {
        tracing::trace!(?op, "transaction");
        self.connection.exec(op.into()).await?;
        Ok(())
    }
}

fn into_items(statement: &str, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Null => Ok(vec![]),
        value => Err(Error::invalid_result(format!(
            "statement `{statement}` returned a single `{}`, expected a list",
            value.infer_ty()
        ))),
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("connection", &self.connection)
            .finish()
    }
}
