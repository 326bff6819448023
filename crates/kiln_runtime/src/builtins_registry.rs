use std::sync::Arc;

use crate::core::{ClassId, Value};
use crate::errors::RtResult;
use crate::methods;
use crate::object::{CoreClasses, MethodBody, MethodEntry, ObjectGraph, Visibility};
use crate::runtime::Runtime;

pub type BuiltinFn = fn(&mut Runtime, Value, &[Value]) -> RtResult<Value>;

struct BuiltinEntry {
    class: ClassId,
    singleton: bool,
    name: &'static str,
    fun: BuiltinFn,
    visibility: Visibility,
}

/// Builtin methods collected before they are written into class tables.
pub struct BuiltinRegistry {
    entries: Vec<BuiltinEntry>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Instance method on `class`.
    pub fn register(&mut self, class: ClassId, name: &'static str, fun: BuiltinFn) {
        self.push(class, false, name, fun, Visibility::Public);
    }

    pub fn register_private(&mut self, class: ClassId, name: &'static str, fun: BuiltinFn) {
        self.push(class, false, name, fun, Visibility::Private);
    }

    /// Method on the metaclass of `class`.
    pub fn register_singleton(&mut self, class: ClassId, name: &'static str, fun: BuiltinFn) {
        self.push(class, true, name, fun, Visibility::Public);
    }

    fn push(
        &mut self,
        class: ClassId,
        singleton: bool,
        name: &'static str,
        fun: BuiltinFn,
        visibility: Visibility,
    ) {
        self.entries.push(BuiltinEntry {
            class,
            singleton,
            name,
            fun,
            visibility,
        });
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry into its class. Bypasses the sealed-core check.
    pub fn install_into(self, graph: &ObjectGraph) {
        for entry in self.entries {
            let class = if entry.singleton {
                graph.metaclass_of(entry.class)
            } else {
                entry.class
            };
            let fun = entry.fun;
            graph.get(class).put_method(MethodEntry {
                owner: class,
                name: graph.intern(entry.name),
                body: MethodBody::Native(Arc::new(fun)),
                visibility: entry.visibility,
            });
        }
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, core: &CoreClasses, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, core: &CoreClasses, registry: &mut BuiltinRegistry) {
        methods::basic_object::install(core, registry);
        methods::kernel::install(core, registry);
        methods::module::install(core, registry);
        methods::class::install(core, registry);
        methods::primitives::install(core, registry);
        methods::string::install(core, registry);
        methods::symbol::install(core, registry);
        methods::numeric::install(core, registry);
        methods::array::install(core, registry);
        methods::comparable::install(core, registry);
        methods::encoding::install(core, registry);
    }
}
