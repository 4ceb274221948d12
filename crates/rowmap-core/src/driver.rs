mod cursor;
pub use cursor::{RowCursor, RowStream};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

mod row;
pub use row::{Column, Row, RowRef};

use crate::{async_trait, Result};

use std::fmt::Debug;

/// Entry point of a database backend.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Opens a connection-like handle. Dropping the handle releases it.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Executes a database operation.
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
