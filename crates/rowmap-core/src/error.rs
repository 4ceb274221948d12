mod adhoc;
mod driver;
mod index_out_of_bounds;
mod introspection;
mod invalid_path;
mod invalid_result;
mod invalid_template;
mod mapping;
mod multiple_results;
mod no_more_elements;
mod null_navigation;
mod result_map;
mod type_conversion;
mod unsupported_type;

use adhoc::AdhocError;
use driver::DriverError;
use index_out_of_bounds::IndexOutOfBounds;
use introspection::Introspection;
use invalid_path::InvalidPath;
use invalid_result::InvalidResult;
use invalid_template::InvalidTemplate;
use mapping::MappingError;
use multiple_results::MultipleResults;
use no_more_elements::NoMoreElements;
use null_navigation::NullNavigation;
use result_map::ResultMapError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use unsupported_type::UnsupportedType;

/// An error that can occur while configuring or running a mapping.
///
/// The error is a single pointer wide. Errors can be chained with
/// [`Error::context`]; the displayed form lists the most recent context first
/// and ends with the root cause.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    /// Returns `true` for errors raised while building configuration-time
    /// metadata: paths, accessors, templates, result maps and handler lookups.
    pub fn is_configuration(&self) -> bool {
        self.chain().any(|err| {
            matches!(
                err.kind(),
                ErrorKind::InvalidPath(_)
                    | ErrorKind::NoMoreElements(_)
                    | ErrorKind::Introspection(_)
                    | ErrorKind::ResultMap(_)
                    | ErrorKind::UnsupportedType(_)
                    | ErrorKind::InvalidTemplate(_)
            )
        })
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Finds the first error in the chain whose kind matches `f`.
    fn find<T: ?Sized>(&self, f: impl Fn(&ErrorKind) -> Option<&T>) -> Option<&T> {
        self.chain().find_map(|err| f(err.kind()))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    IndexOutOfBounds(IndexOutOfBounds),
    Introspection(Introspection),
    InvalidPath(InvalidPath),
    InvalidResult(InvalidResult),
    InvalidTemplate(InvalidTemplate),
    Mapping(MappingError),
    MultipleResults(MultipleResults),
    NoMoreElements(NoMoreElements),
    NullNavigation(NullNavigation),
    ResultMap(ResultMapError),
    TypeConversion(TypeConversionError),
    UnsupportedType(UnsupportedType),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            IndexOutOfBounds(err) => core::fmt::Display::fmt(err, f),
            Introspection(err) => core::fmt::Display::fmt(err, f),
            InvalidPath(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            InvalidTemplate(err) => core::fmt::Display::fmt(err, f),
            Mapping(err) => core::fmt::Display::fmt(err, f),
            MultipleResults(err) => core::fmt::Display::fmt(err, f),
            NoMoreElements(err) => core::fmt::Display::fmt(err, f),
            NullNavigation(err) => core::fmt::Display::fmt(err, f),
            ResultMap(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UnsupportedType(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown rowmap error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
