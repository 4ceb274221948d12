use super::{Column, Row};
use crate::Result;

use std::{
    collections::VecDeque,
    fmt,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

type DynStream = Pin<Box<dyn Stream<Item = Result<Row>> + Send + 'static>>;

/// Rows produced by a query, buffered or streamed.
#[derive(Default)]
pub struct RowStream {
    buffer: VecDeque<Row>,
    stream: Option<DynStream>,
}

impl RowStream {
    pub fn from_vec(rows: Vec<Row>) -> Self {
        Self {
            buffer: rows.into(),
            stream: None,
        }
    }

    pub fn from_stream<T: Stream<Item = Result<Row>> + Send + 'static>(stream: T) -> Self {
        Self {
            buffer: VecDeque::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    /// Returns the next row in the stream
    pub async fn next(&mut self) -> Option<Result<Row>> {
        StreamExt::next(self).await
    }

    pub async fn collect(mut self) -> Result<Vec<Row>> {
        let mut ret = Vec::with_capacity(self.buffer.len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }

    pub async fn dup(&mut self) -> Result<Self> {
        self.buffer().await?;

        Ok(Self {
            buffer: self.buffer.clone(),
            stream: None,
        })
    }

    async fn buffer(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            while let Some(res) = stream.next().await {
                self.buffer.push_back(res?);
            }
        }

        Ok(())
    }
}

impl Stream for RowStream {
    type Item = Result<Row>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(next) = self.buffer.pop_front() {
            Poll::Ready(Some(Ok(next)))
        } else if let Some(stream) = self.stream.as_mut() {
            stream.as_mut().poll_next(cx)
        } else {
            Poll::Ready(None)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (low, high) = match &self.stream {
            Some(stream) => stream.size_hint(),
            None => (0, Some(0)),
        };

        let buffered = self.buffer.len();
        (low + buffered, high.map(|high| high + buffered))
    }
}

impl From<Vec<Row>> for RowStream {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_vec(rows)
    }
}

impl fmt::Debug for RowStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("buffered", &self.buffer.len())
            .field("streaming", &self.stream.is_some())
            .finish()
    }
}

/// A query result set: column metadata plus the row stream.
#[derive(Debug)]
pub struct RowCursor {
    columns: Arc<[Column]>,
    rows: RowStream,
}

impl RowCursor {
    pub fn new(columns: impl Into<Arc<[Column]>>, rows: impl Into<RowStream>) -> RowCursor {
        RowCursor {
            columns: columns.into(),
            rows: rows.into(),
        }
    }

    pub fn columns(&self) -> &Arc<[Column]> {
        &self.columns
    }

    pub async fn next(&mut self) -> Option<Result<Row>> {
        self.rows.next().await
    }

    pub async fn collect(self) -> Result<Vec<Row>> {
        self.rows.collect().await
    }

    pub async fn dup(&mut self) -> Result<RowCursor> {
        Ok(RowCursor {
            columns: self.columns.clone(),
            rows: self.rows.dup().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn buffered_rows_come_back_in_order() {
        let rows = vec![
            Row::new(vec![Value::I64(1)]),
            Row::new(vec![Value::I64(2)]),
        ];
        let mut cursor = RowCursor::new(vec![Column::new("id", 1)], rows.clone());

        let copy = cursor.dup().await.unwrap();
        assert_eq!(copy.collect().await.unwrap(), rows);
        assert_eq!(cursor.collect().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn streamed_rows_follow_buffered_ones() {
        let stream = tokio_stream::iter(vec![Ok(Row::new(vec![Value::I64(3)]))]);
        let mut rows = RowStream::from_stream(stream);

        let first = rows.next().await.unwrap().unwrap();
        assert_eq!(first.values(), &[Value::I64(3)]);
        assert!(rows.next().await.is_none());
    }
}
