use super::RowCursor;
use crate::Result;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Result set of a query
    Cursor(RowCursor),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn cursor(cursor: RowCursor) -> Self {
        Self {
            rows: Rows::Cursor(cursor),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor(_))
    }

    /// Buffers the remaining rows and returns an independent copy.
    pub async fn dup(&mut self) -> Result<Self> {
        match self {
            Rows::Count(count) => Ok(Rows::Count(*count)),
            Rows::Cursor(cursor) => Ok(Rows::Cursor(cursor.dup().await?)),
        }
    }
}
