use super::Error;

/// A single-value target received a second value.
#[derive(Debug)]
pub(super) struct MultipleResults {
    target: Box<str>,
}

impl std::error::Error for MultipleResults {}

impl core::fmt::Display for MultipleResults {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "expected at most one result for `{}`, got more",
            self.target
        )
    }
}

impl Error {
    pub fn multiple_results(target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MultipleResults(MultipleResults {
            target: target.into().into(),
        }))
    }

    pub fn is_multiple_results(&self) -> bool {
        self.find(|kind| match kind {
            super::ErrorKind::MultipleResults(err) => Some(err),
            _ => None,
        })
        .is_some()
    }
}
