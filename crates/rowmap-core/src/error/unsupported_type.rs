use super::Error;

/// No type handler is registered for a type.
#[derive(Debug)]
pub(super) struct UnsupportedType {
    ty: Box<str>,
}

impl std::error::Error for UnsupportedType {}

impl core::fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no type handler registered for `{}`", self.ty)
    }
}

impl Error {
    pub fn unsupported_type(ty: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            ty: ty.to_string().into(),
        }))
    }

    pub fn is_unsupported_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedType(_))
    }
}
