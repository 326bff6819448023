//! Core runtime infrastructure.
//!
//! This module contains the per-runtime storage for non-class objects:
//! - `Heap` - Arena of plain instances and strings
//! - `RObject` - Per-object state (class, singleton class, ivars, frozen flag)

pub mod heap;

pub use heap::{Heap, Payload, RObject};
pub use kiln_core::value::{
    FastHashMap, FastIndexMap, FastIndexSet, fast_index_map_new, fast_index_set_new, fast_map_new,
};
pub use kiln_core::{ClassId, EncodingId, ObjectId, Symbol, Value, ValueKind};
