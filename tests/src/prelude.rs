//! Common imports for test files
//!
//! This module provides a convenient way to import frequently used items
//! in test files with `use tests::prelude::*;`

// Re-export core test infrastructure
pub use crate::{ExecLog, Setup};

// Shared schema
pub use crate::blog::{self, author, comment, Author, Comment, Post};

// Re-export macros
pub use crate::tests;

pub use rowmap::{
    args, sink, AccessorStrategy, Accessors, Bean, Configuration, Db, Error, Reflect, ResultMap,
    Returns, Statement, Type, Typed, Value,
};
