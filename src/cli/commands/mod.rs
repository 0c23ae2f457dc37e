//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod init;
pub mod upload;
pub mod validate;
