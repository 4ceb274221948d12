mod value;
pub(crate) use value::Value;

use rowmap_core::{
    async_trait,
    driver::{
        operation::{Operation, QuerySql, Transaction},
        Column, Driver, Response, Row, RowCursor,
    },
    Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use url::Url;

/// SQLite driver.
///
/// Every connection handed out by [`Driver::connect`] shares the database
/// handle opened on construction, so fixtures written through
/// [`Sqlite::execute_batch`] are visible to them, even in memory.
#[derive(Debug, Clone)]
pub struct Sqlite {
    location: Location,
    connection: Arc<Mutex<RusqliteConnection>>,
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with a connection URL: `sqlite::memory:`
    /// or `sqlite:<path>`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(rowmap_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self::with_connection(Location::InMemory, connection))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let connection = RusqliteConnection::open(&path).map_err(Error::driver)?;
        Ok(Self::with_connection(Location::File(path), connection))
    }

    fn with_connection(location: Location, connection: RusqliteConnection) -> Self {
        Self {
            location,
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    pub fn url(&self) -> Cow<'_, str> {
        match &self.location {
            Location::InMemory => Cow::Borrowed("sqlite::memory:"),
            Location::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    /// Runs `;`-separated SQL without parameters, typically schema and
    /// fixture rows.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        lock(&self.connection)?
            .execute_batch(sql)
            .map_err(Error::driver)
    }
}

#[async_trait]
impl Driver for Sqlite {
    async fn connect(&self) -> Result<Box<dyn rowmap_core::Connection>> {
        Ok(Box::new(Connection {
            connection: self.connection.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

#[async_trait]
impl rowmap_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let connection = lock(&self.connection)?;

        let sql = match op {
            Operation::QuerySql(op) => return query(&connection, op),
            Operation::Transaction(Transaction::Start) => "BEGIN",
            Operation::Transaction(Transaction::Commit) => "COMMIT",
            Operation::Transaction(Transaction::Rollback) => "ROLLBACK",
        };

        connection.execute(sql, []).map_err(Error::driver)?;
        Ok(Response::count(0))
    }
}

fn query(connection: &RusqliteConnection, op: QuerySql) -> Result<Response> {
    let mut stmt = connection.prepare_cached(&op.sql).map_err(Error::driver)?;

    let params = op
        .params
        .into_iter()
        .map(|param| Value::from(param.value))
        .collect::<Vec<_>>();

    if stmt.column_count() == 0 {
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        return Ok(Response::count(count as u64));
    }

    let columns = stmt
        .column_names()
        .into_iter()
        .enumerate()
        .map(|(index, name)| Column::new(name, index + 1))
        .collect::<Vec<_>>();
    let width = columns.len();

    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter()))
        .map_err(Error::driver)?;

    let mut ret = vec![];

    while let Some(row) = rows.next().map_err(Error::driver)? {
        let mut items = Vec::with_capacity(width);

        for index in 0..width {
            let value = row.get_ref(index).map_err(Error::driver)?;
            items.push(Value::from_sql(value).into_inner());
        }

        ret.push(Row::new(items));
    }

    Ok(Response::cursor(RowCursor::new(columns, ret)))
}

fn lock(
    connection: &Mutex<RusqliteConnection>,
) -> Result<std::sync::MutexGuard<'_, RusqliteConnection>> {
    connection
        .lock()
        .map_err(|_| rowmap_core::err!("sqlite connection lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowmap_core::{driver::Rows, SqlType, Value};

    fn driver() -> Sqlite {
        let sqlite = Sqlite::new("sqlite::memory:").unwrap();
        sqlite
            .execute_batch(
                "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT, score REAL);
                 INSERT INTO posts VALUES (1, 'hello', 1.5), (2, NULL, NULL);",
            )
            .unwrap();
        sqlite
    }

    #[test]
    fn urls() {
        assert_eq!(Sqlite::in_memory().unwrap().url(), "sqlite::memory:");
        assert!(Sqlite::new("postgres://localhost/db").is_err());
    }

    #[tokio::test]
    async fn queries_return_named_columns() {
        let mut connection = driver().connect().await.unwrap();

        let mut op = QuerySql::new("SELECT id, title AS Title, score FROM posts WHERE id >= ? ORDER BY id");
        op.bind(1, Value::I32(1), SqlType::Integer);

        let Rows::Cursor(cursor) = connection.exec(op.into()).await.unwrap().rows else {
            panic!("expected a cursor");
        };

        let names = cursor
            .columns()
            .iter()
            .map(|column| (column.name.clone(), column.index))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![("id".to_string(), 1), ("Title".to_string(), 2), ("score".to_string(), 3)]
        );

        let rows = cursor.collect().await.unwrap();
        assert_eq!(
            rows,
            vec![
                Row::new(vec![Value::I64(1), Value::from("hello"), Value::F64(1.5)]),
                Row::new(vec![Value::I64(2), Value::Null, Value::Null]),
            ]
        );
    }

    #[tokio::test]
    async fn updates_return_counts_and_share_the_database() {
        let sqlite = driver();
        let mut connection = sqlite.connect().await.unwrap();

        let response = connection
            .exec(QuerySql::new("UPDATE posts SET score = 0").into())
            .await
            .unwrap();
        assert!(matches!(response.rows, Rows::Count(2)));

        connection.exec(Transaction::Start.into()).await.unwrap();
        connection
            .exec(QuerySql::new("DELETE FROM posts").into())
            .await
            .unwrap();
        connection.exec(Transaction::Rollback.into()).await.unwrap();

        let mut other = sqlite.connect().await.unwrap();
        let Rows::Cursor(cursor) = other
            .exec(QuerySql::new("SELECT count(*) FROM posts").into())
            .await
            .unwrap()
            .rows
        else {
            panic!("expected a cursor");
        };
        assert_eq!(cursor.collect().await.unwrap(), vec![Row::new(vec![Value::I64(2)])]);
    }

    #[tokio::test]
    async fn unsupported_parameters_fail() {
        let mut connection = driver().connect().await.unwrap();

        let mut op = QuerySql::new("SELECT ?");
        op.bind(1, Value::List(vec![]), SqlType::Any);

        let err = connection.exec(op.into()).await.unwrap_err();
        assert!(err.is_driver());
    }
}
