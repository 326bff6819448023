//! Object model: classes, modules, metaclasses and the graph that links them.

mod bootstrap;
pub mod class;
pub mod graph;
pub mod names;

pub use class::{ClassKind, ClassObject, ConstEntry, MethodBody, MethodEntry, NativeFn, Visibility};
pub use graph::{CoreClasses, ObjectGraph};
