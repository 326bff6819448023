//! Core types for the kiln object-model kernel.
//!
//! This crate contains the fundamental types that are independent of the runtime:
//! - `Value` - NaN-boxed runtime value representation
//! - `ObjectId`, `ClassId`, `EncodingId` - Handles into the runtime arenas
//! - `Symbol` and `Interner` - Interned method, constant and ivar names

pub mod handle;
pub mod symbol;
pub mod value;

pub use handle::{ClassId, EncodingId, ObjectId};
pub use symbol::{Interner, Symbol};
pub use value::{Value, ValueKind};
