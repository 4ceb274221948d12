//! Maps SQL result sets onto object graphs and flattens arguments into
//! statement parameters.
//!
//! ```ignore
//! #[derive(Debug, Default, rowmap::Bean)]
//! struct Post {
//!     id: i64,
//!     title: String,
//!     comments: Vec<Comment>,
//! }
//!
//! let mut config = Configuration::new();
//! let comment = config.add_result_map(ResultMap::builder::<Comment>("comment").auto(true))?;
//! let post = config.add_result_map(
//!     ResultMap::builder::<Post>("post")
//!         .column("id", "post_id")
//!         .column("title", "title")
//!         .nested("comments", &comment)
//!         .group_by(["id"]),
//! )?;
//! config.add_statement(
//!     Statement::builder("postsBy", "SELECT ... WHERE author = ${1}")
//!         .params([Type::String])
//!         .returns(Returns::List(post)),
//! )?;
//!
//! let db = Db::new(driver, config)?;
//! let posts: Vec<Post> = db.list("postsBy", args!["ana"]).await?;
//! ```

extern crate self as rowmap;

pub mod accessor;
pub use accessor::{AccessorStrategy, Accessors, Getter, Setter};

mod config;
pub use config::Configuration;

pub mod db;
pub use db::{Db, Session};

mod engine;

pub mod result_map;
pub use result_map::{ColumnRef, ResultMap, ResultMapBuilder};

pub mod sink;
pub use sink::Sink;

pub mod statement;
pub use statement::{Returns, Statement, StatementBuilder};

pub mod template;
pub use template::Template;

pub use rowmap_macros::Bean;

pub use rowmap_core::{
    bail, driver, err, Bean, Error, Field, Object, PropertyPath, Reflect, Result, Type,
    TypeHandler, TypeHandlers, Typed, Value,
};

#[cfg(feature = "sqlite")]
pub use rowmap_driver_sqlite::Sqlite;

#[doc(hidden)]
pub mod codegen_support {
    pub use rowmap_core::{
        Bean, BeanDescriptor, BeanRef, Error, Field, PropertyDescriptor, Reflect, Result, Type,
        Typed, Value,
    };
    pub use std::{any::Any, boxed::Box, option::Option, sync::OnceLock, vec::Vec};
}
