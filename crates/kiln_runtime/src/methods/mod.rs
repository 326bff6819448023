//! Builtin method tables, one module per core class.

mod common;

pub(crate) mod array;
pub(crate) mod basic_object;
pub(crate) mod class;
pub(crate) mod comparable;
pub(crate) mod encoding;
pub(crate) mod kernel;
pub(crate) mod module;
pub(crate) mod numeric;
pub(crate) mod primitives;
pub(crate) mod string;
pub(crate) mod symbol;
