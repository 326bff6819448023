//! Build configuration table.
//!
//! - `ConfigRegistry` - String-only key/value table plus derived flags
//! - `ConfigSource` - Where the raw pairs come from (`BuildSource`, `TextSource`, `PairsSource`)

pub mod error;
pub mod registry;
pub mod source;

pub use error::ConfigError;
pub use registry::{ConfigEntry, ConfigRegistry, DERIVED_FLAGS, DerivedFlag};
pub use source::{BuildSource, ConfigSource, LANGUAGE_VERSION, PairsSource, RawValue, TextSource};
