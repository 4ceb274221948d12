use super::Error;

/// A result map declaration is inconsistent with its target or with the
/// columns of a result set.
#[derive(Debug)]
pub(super) struct ResultMapError {
    message: Box<str>,
}

impl std::error::Error for ResultMapError {}

impl core::fmt::Display for ResultMapError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid result map: {}", self.message)
    }
}

impl Error {
    pub fn result_map(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ResultMap(ResultMapError {
            message: message.into().into(),
        }))
    }

    pub fn is_result_map(&self) -> bool {
        self.find(|kind| match kind {
            super::ErrorKind::ResultMap(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
