use super::Error;

/// A path cursor was advanced past its last step.
#[derive(Debug)]
pub(super) struct NoMoreElements {
    path: Box<str>,
}

impl std::error::Error for NoMoreElements {}

impl core::fmt::Display for NoMoreElements {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no more elements in property path `{}`", self.path)
    }
}

impl Error {
    pub fn no_more_elements(path: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoMoreElements(NoMoreElements {
            path: path.into().into(),
        }))
    }

    pub fn is_no_more_elements(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoMoreElements(_))
    }
}
