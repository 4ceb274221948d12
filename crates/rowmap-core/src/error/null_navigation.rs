use super::Error;

/// An intermediate step of a property path evaluated to null.
#[derive(Debug)]
pub(super) struct NullNavigation {
    prefix: Box<str>,
    declaring: Box<str>,
}

impl std::error::Error for NullNavigation {}

impl core::fmt::Display for NullNavigation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot navigate through null value at `{}` (declared on `{}`)",
            self.prefix, self.declaring
        )
    }
}

impl Error {
    /// `prefix` is the consumed part of the path ending with the null step;
    /// `declaring` names the type owning that step.
    pub fn null_navigation(prefix: impl Into<String>, declaring: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::NullNavigation(NullNavigation {
            prefix: prefix.into().into(),
            declaring: declaring.to_string().into(),
        }))
    }

    pub fn is_null_navigation(&self) -> bool {
        self.null_navigation_prefix().is_some()
    }

    pub fn null_navigation_prefix(&self) -> Option<&str> {
        self.find(|kind| match kind {
            super::ErrorKind::NullNavigation(err) => Some(&*err.prefix),
            _ => None,
        })
    }

    pub fn null_navigation_declaring_type(&self) -> Option<&str> {
        self.find(|kind| match kind {
            super::ErrorKind::NullNavigation(err) => Some(&*err.declaring),
            _ => None,
        })
    }
}
