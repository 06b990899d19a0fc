//! High-level operations.
//!
//! This module contains the implementation of osconfig commands.

pub mod check;
pub mod configure;
pub mod query;

pub use check::{check, format_declarations, format_report, CheckReport};
pub use configure::{configure, load_profile, ConfigureOptions, ConfigureResult};
pub use query::{query, QueryAnswer};
