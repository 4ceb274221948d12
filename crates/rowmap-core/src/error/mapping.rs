use super::Error;

/// A row could not be turned into a target object.
#[derive(Debug)]
pub(super) struct MappingError {
    target: Box<str>,
    message: Box<str>,
}

impl std::error::Error for MappingError {}

impl core::fmt::Display for MappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to map `{}`: {}", self.target, self.message)
    }
}

impl Error {
    pub fn mapping(target: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Mapping(MappingError {
            target: target.into().into(),
            message: message.into().into(),
        }))
    }

    pub fn is_mapping(&self) -> bool {
        self.find(|kind| match kind {
            super::ErrorKind::Mapping(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
