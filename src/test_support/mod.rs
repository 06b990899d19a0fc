//! Test utilities for osconfig unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{darwin_arm64, SheetFixture};
//!
//! #[test]
//! fn test_example() {
//!     let sheet = SheetFixture::from(darwin_arm64())
//!         .without("SIZEOF_OFF_T")
//!         .with("WITH_ICU", true)
//!         .build();
//!     // Resolve the sheet...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
