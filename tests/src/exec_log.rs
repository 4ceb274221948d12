use crate::logging_driver::DriverOp;

use rowmap_core::{
    driver::operation::{Operation, QuerySql, Transaction},
    Value,
};
use std::sync::{Arc, Mutex};

/// Operations recorded by a [`LoggingDriver`](crate::LoggingDriver), shared
/// with every connection it opened.
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> ExecLog {
        ExecLog { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SQL text of every query, in execution order.
    pub fn queries(&self) -> Vec<String> {
        self.map_queries(|query| query.sql.clone())
    }

    /// Bound parameter values of every query, in execution order.
    pub fn params(&self) -> Vec<Vec<Value>> {
        self.map_queries(|query| {
            query
                .params
                .iter()
                .map(|param| param.value.clone())
                .collect()
        })
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::Transaction(transaction) => Some(*transaction),
                Operation::QuerySql(_) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Removes and returns the oldest recorded operation.
    pub fn pop(&mut self) -> Option<DriverOp> {
        let mut ops = self.ops.lock().unwrap();
        (!ops.is_empty()).then(|| ops.remove(0))
    }

    fn map_queries<T>(&self, f: impl Fn(&QuerySql) -> T) -> Vec<T> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::QuerySql(query) => Some(f(query)),
                Operation::Transaction(_) => None,
            })
            .collect()
    }
}
