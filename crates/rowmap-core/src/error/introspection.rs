use super::Error;

/// A bean type does not expose what a path or mapping asks for.
///
/// Raised for missing properties, read-only properties targeted by a setter,
/// unbound type variables and parameter slots out of range.
#[derive(Debug)]
pub(super) struct Introspection {
    message: Box<str>,
}

impl std::error::Error for Introspection {}

impl core::fmt::Display for Introspection {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "introspection failed: {}", self.message)
    }
}

impl Error {
    pub fn introspection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Introspection(Introspection {
            message: message.into().into(),
        }))
    }

    pub fn is_introspection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Introspection(_))
    }
}
