//! Runtime module - object model operations and method dispatch.
//!
//! The `Runtime` struct lives in core.rs; dispatch is implemented in dispatch.rs
//! as a second `impl Runtime` block.

mod config;
mod dispatch;

pub use config::{RuntimeConfig, ValuePolicy};

mod core;
pub use self::core::Runtime;
pub(crate) use self::core::format_float;
