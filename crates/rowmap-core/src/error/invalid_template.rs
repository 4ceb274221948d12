use super::Error;

/// A statement template has a malformed placeholder.
#[derive(Debug)]
pub(super) struct InvalidTemplate {
    template: Box<str>,
    position: usize,
    reason: Box<str>,
}

impl std::error::Error for InvalidTemplate {}

impl core::fmt::Display for InvalidTemplate {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid template at offset {}: {}; template=`{}`",
            self.position, self.reason, self.template
        )
    }
}

impl Error {
    pub fn invalid_template(
        template: impl Into<String>,
        position: usize,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidTemplate(InvalidTemplate {
            template: template.into().into(),
            position,
            reason: reason.into().into(),
        }))
    }

    pub fn is_invalid_template(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidTemplate(_))
    }
}
