use super::Error;

/// A property path could not be parsed, or a step does not apply to the
/// type it addresses.
#[derive(Debug)]
pub(super) struct InvalidPath {
    path: Box<str>,
    position: usize,
    reason: Box<str>,
}

impl std::error::Error for InvalidPath {}

impl core::fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid property path `{}` at offset {}: {}",
            self.path, self.position, self.reason
        )
    }
}

impl Error {
    pub fn invalid_path(path: impl Into<String>, position: usize, reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidPath(InvalidPath {
            path: path.into().into(),
            position,
            reason: reason.into().into(),
        }))
    }

    pub fn is_invalid_path(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidPath(_))
    }

    /// Byte offset of the offending character for an invalid path error.
    pub fn invalid_path_position(&self) -> Option<usize> {
        self.find(|kind| match kind {
            super::ErrorKind::InvalidPath(err) => Some(&err.position),
            _ => None,
        })
        .copied()
    }
}
