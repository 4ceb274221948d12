use crate::{Error, Result, Value};

/// Result set column metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,

    /// 1-based position in the row.
    pub index: usize,
}

impl Column {
    pub fn new(name: impl Into<String>, index: usize) -> Column {
        Column {
            name: name.into(),
            index,
        }
    }
}

/// One row of a result set, values in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Row {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Row {
        Row::new(values)
    }
}

/// A row paired with the column metadata of its result set.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    row: &'a Row,
    columns: &'a [Column],
}

impl<'a> RowRef<'a> {
    pub fn new(row: &'a Row, columns: &'a [Column]) -> RowRef<'a> {
        RowRef { row, columns }
    }

    pub fn columns(&self) -> &'a [Column] {
        self.columns
    }

    /// Value of the column at the 1-based `index`.
    pub fn get(&self, index: usize) -> Result<&'a Value> {
        index
            .checked_sub(1)
            .and_then(|position| self.row.values.get(position))
            .ok_or_else(|| {
                Error::result_map(format!(
                    "column index {index} is out of range; result set has {} column(s)",
                    self.row.len()
                ))
            })
    }

    /// 1-based index of the column named `name`, ignoring ASCII case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
            .map(|column| column.index)
    }
}
