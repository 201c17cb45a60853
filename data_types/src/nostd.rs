//! Re-exports for no_std compatibility
//!
//! Only used when the `nostd` feature is enabled.

pub use core::fmt;
