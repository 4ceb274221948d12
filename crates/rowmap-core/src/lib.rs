#[macro_use]
mod macros;

pub mod bean;
pub use bean::{Bean, BeanDescriptor, BeanRef, PropertyDescriptor};

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod handler;
pub use handler::{SqlType, TypeHandler, TypeHandlers};

pub mod path;
pub use path::{PathCursor, PropertyPath, Step};

pub mod reflect;
pub use reflect::{Field, Reflect, Typed};

pub mod resolve;

mod ty;
pub use ty::Type;

pub mod value;
pub use value::{Object, Value};

/// A Result type alias that uses rowmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
