//! Kiln object-model runtime.
//!
//! Classes, metaclasses and singleton classes, method dispatch with a
//! `method_missing` fallback, constant lookup, the encoding catalog with its
//! process-wide defaults, and the build configuration table.

#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::type_complexity)]

pub mod core;
pub mod errors;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod object;

mod runtime;
pub mod builtins_registry;
mod methods;

// Re-exports from core/
pub use self::core::heap;
pub use self::core::{ClassId, EncodingId, ObjectId, Symbol, Value, ValueKind};

// Re-exports from other modules
pub use builtins_registry::{BuiltinFn, BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
pub use config::{ConfigError, ConfigRegistry, ConfigSource, DerivedFlag};
pub use constants::ConstantResolver;
pub use encoding::{Coerced, CoercesToString, EncodingArg, EncodingRegistry};
pub use errors::{RtResult, RuntimeError};
pub use object::{ClassKind, CoreClasses, MethodEntry, ObjectGraph, Visibility};

// Runtime structs and enums
pub use runtime::Runtime;
pub use runtime::{RuntimeConfig, ValuePolicy};
