use super::Error;

/// A value cannot be converted to the expected type.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    from: Box<str>,
    to: Box<str>,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to)
    }
}

impl Error {
    /// `from` describes the source value, `to` names the target type.
    pub fn type_conversion(from: impl core::fmt::Display, to: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            from: from.to_string().into(),
            to: to.to_string().into(),
        }))
    }

    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}
