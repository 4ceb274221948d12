//! Runs statements and maps their result sets.
//!
//! Every top-level call owns one [`Request`]: an arena of the objects
//! created so far, the group-key index of every grouped map and the pending
//! nested sinks. Ungrouped results are flushed after each row so the caller's
//! sink sees them as they arrive; results that involve a grouped map are
//! flushed once the cursor is drained.

mod request;
use request::{Parent, Request};

use crate::{
    sink::{ArraySink, ListSink, SingleSink, Sink},
    Configuration, Returns, Statement,
};

use rowmap_core::{
    driver::{Response, RowCursor, RowRef, Rows},
    Connection, Error, Result, Value,
};

use std::{future::Future, pin::Pin};

/// Deepest chain of subselects a single call may run.
const MAX_DEPTH: usize = 32;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a statement runs against.
pub(crate) struct Cx<'a> {
    pub(crate) connection: &'a mut dyn Connection,
    pub(crate) config: &'a Configuration,

    /// Number of subselects enclosing this call.
    depth: usize,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(connection: &'a mut dyn Connection, config: &'a Configuration) -> Cx<'a> {
        Cx {
            connection,
            config,
            depth: 0,
        }
    }
}

/// Executes `statement` and returns its result as a single value: the
/// affected row count, the mapped object (or null), or a list of them.
pub(crate) async fn execute(cx: &mut Cx<'_>, statement: &Statement, args: &[Value]) -> Result<Value> {
    let rows = run(cx, statement, args).await?;

    match (statement.returns(), rows) {
        (Returns::Count, Rows::Count(count)) => Ok(Value::U64(count)),
        (Returns::Count, Rows::Cursor(_)) => Err(Error::invalid_result(format!(
            "statement `{}` returned rows, expected an update count",
            statement.name()
        ))),
        (_, Rows::Count(_)) => Err(Error::invalid_result(format!(
            "statement `{}` returned an update count, expected rows",
            statement.name()
        ))),
        (Returns::One(map), Rows::Cursor(cursor)) => {
            let mut sink = SingleSink::new(statement.name());
            map_cursor(cx, map, cursor, &mut sink).await?;
            Ok(sink.into_value().unwrap_or_default())
        }
        (Returns::List(map), Rows::Cursor(cursor)) => {
            let mut sink = ListSink::new();
            map_cursor(cx, map, cursor, &mut sink).await?;
            Ok(Value::List(sink.into_items()))
        }
        (Returns::Array(map), Rows::Cursor(cursor)) => {
            let mut sink = ArraySink::new(map.ty().clone());
            map_cursor(cx, map, cursor, &mut sink).await?;
            Ok(Value::List(
                sink.into_array().map(Vec::from).unwrap_or_default(),
            ))
        }
        (Returns::Callback(_), Rows::Cursor(_)) => Err(Error::mapping(
            statement.name(),
            "statement pushes into a caller sink; run it with `exec_into`",
        )),
    }
}

/// Executes `statement` and pushes every mapped value into `sink`. Update
/// statements push their row count.
pub(crate) async fn execute_into(
    cx: &mut Cx<'_>,
    statement: &Statement,
    args: &[Value],
    sink: &mut dyn Sink,
) -> Result<()> {
    let rows = run(cx, statement, args).await?;

    match (statement.returns().result_map(), rows) {
        (_, Rows::Count(count)) => {
            sink.push(Value::U64(count))?;
            sink.commit()
        }
        (Some(map), Rows::Cursor(cursor)) => map_cursor(cx, map, cursor, sink).await,
        (None, Rows::Cursor(_)) => Err(Error::invalid_result(format!(
            "statement `{}` returned rows, expected an update count",
            statement.name()
        ))),
    }
}

async fn run(cx: &mut Cx<'_>, statement: &Statement, args: &[Value]) -> Result<Rows> {
    let query = statement.template().query(args)?;

    tracing::trace!(
        statement = statement.name(),
        sql = %query.sql,
        params = query.params.len(),
        depth = cx.depth,
        "executing statement"
    );

    let Response { rows } = cx.connection.exec(query.into()).await?;
    Ok(rows)
}

/// Maps every row of `cursor` with `map`, pushing results into `sink` and
/// committing it once the cursor is drained.
pub(crate) async fn map_cursor(
    cx: &mut Cx<'_>,
    map: &crate::ResultMap,
    mut cursor: RowCursor,
    sink: &mut dyn Sink,
) -> Result<()> {
    let columns = cursor.columns().clone();
    map.prepare(&columns)?;

    let grouped = map.is_grouped();
    let mut request = Request::default();
    let mut count = 0;

    while let Some(row) = cursor.next().await {
        let row = row?;
        request.map_row(map, RowRef::new(&row, &columns), Parent::Root)?;
        count += 1;

        if !grouped {
            request.flush(cx, sink).await?;
        }
    }

    request.flush(cx, sink).await?;
    sink.commit()?;

    tracing::trace!(map = map.id(), rows = count, grouped, "mapped result set");
    Ok(())
}

/// Runs the statement named `name` with `arg` as its only argument.
///
/// Boxed to break the recursion through `execute`.
fn subselect<'a>(cx: &'a mut Cx<'_>, name: &'a str, arg: Value) -> BoxFuture<'a, Result<Value>> {
    Box::pin(async move {
        if cx.depth >= MAX_DEPTH {
            return Err(Error::mapping(
                name,
                format!("subselects nested deeper than {MAX_DEPTH} levels"),
            ));
        }

        let Some(statement) = cx.config.statement(name) else {
            return Err(Error::mapping(name, "no statement with this name is registered"));
        };

        let mut nested = Cx {
            connection: &mut *cx.connection,
            config: cx.config,
            depth: cx.depth + 1,
        };

        execute(&mut nested, statement, &[arg]).await
    })
}
