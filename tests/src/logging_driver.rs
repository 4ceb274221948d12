use crate::ExecLog;

use rowmap_core::{
    async_trait,
    driver::{Connection, Driver, Operation, Response},
    Result,
};
use std::sync::{Arc, Mutex};

/// Wraps a driver and records every operation its connections run, along
/// with a buffered copy of the response.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

/// One recorded operation.
#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub response: Response,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> LoggingDriver {
        LoggingDriver {
            inner: driver,
            ops: Arc::default(),
        }
    }

    /// A view of the operations recorded so far and from now on.
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops.clone())
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops: self.ops.clone(),
        }))
    }
}

#[derive(Debug)]
struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        let mut response = self.inner.exec(operation.clone()).await?;

        // The engine drains the cursor, so the log keeps its own copy.
        let recorded = Response {
            rows: response.rows.dup().await?,
        };

        self.ops.lock().unwrap().push(DriverOp {
            operation,
            response: recorded,
        });

        Ok(response)
    }
}
