use super::Error;

/// An index step addressed an element past the end of a list or array.
#[derive(Debug)]
pub(super) struct IndexOutOfBounds {
    path: Box<str>,
    index: usize,
    len: usize,
}

impl std::error::Error for IndexOutOfBounds {}

impl core::fmt::Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "index {} out of bounds at `{}` (length {})",
            self.index, self.path, self.len
        )
    }
}

impl Error {
    pub fn index_out_of_bounds(path: impl Into<String>, index: usize, len: usize) -> Error {
        Error::from(super::ErrorKind::IndexOutOfBounds(IndexOutOfBounds {
            path: path.into().into(),
            index,
            len,
        }))
    }

    pub fn is_index_out_of_bounds(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IndexOutOfBounds(_))
    }
}
