//! Delimited input files
//!
//! [`TabularReader`] turns a CSV (or other single-character delimited) file
//! into [`Row`](crate::domain::Row)s keyed by column name.

pub mod reader;

pub use reader::{Rows, TabularReader};
