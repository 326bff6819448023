//! The class/metaclass graph.
//!
//! Classes live in an append-only arena addressed by `ClassId`. Every class and
//! module gets its metaclass eagerly; metaclasses of metaclasses and singleton
//! classes of plain objects are created on first request and memoized.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::constants::ConstantResolver;
use crate::core::{ClassId, Symbol, Value, ValueKind};
use crate::errors::{RtResult, RuntimeError, messages};
use kiln_core::Interner;

use super::class::{ClassKind, ClassObject, MethodEntry};

/// Handles of the classes created at bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct CoreClasses {
    pub basic_object: ClassId,
    pub object: ClassId,
    pub module: ClassId,
    pub class: ClassId,
    pub kernel: ClassId,
    pub comparable: ClassId,
    pub nil_class: ClassId,
    pub true_class: ClassId,
    pub false_class: ClassId,
    pub integer: ClassId,
    pub float: ClassId,
    pub string: ClassId,
    pub symbol: ClassId,
    pub array: ClassId,
    pub encoding: ClassId,
}

impl CoreClasses {
    pub(super) fn unset() -> Self {
        let none = ClassId(usize::MAX);
        Self {
            basic_object: none,
            object: none,
            module: none,
            class: none,
            kernel: none,
            comparable: none,
            nil_class: none,
            true_class: none,
            false_class: none,
            integer: none,
            float: none,
            string: none,
            symbol: none,
            array: none,
            encoding: none,
        }
    }
}

pub struct ObjectGraph {
    classes: RwLock<Vec<Arc<ClassObject>>>,
    names: RwLock<Interner>,
    pub(super) core: CoreClasses,
}

impl ObjectGraph {
    pub(super) fn empty() -> Self {
        Self {
            classes: RwLock::new(Vec::with_capacity(64)),
            names: RwLock::new(Interner::new()),
            core: CoreClasses::unset(),
        }
    }

    pub fn core(&self) -> &CoreClasses {
        &self.core
    }

    // Names

    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(sym) = self.names.read().get(name) {
            return sym;
        }
        self.names.write().intern(name)
    }

    pub fn lookup_symbol(&self, name: &str) -> Option<Symbol> {
        self.names.read().get(name)
    }

    pub fn symbol_name(&self, sym: Symbol) -> String {
        self.names
            .read()
            .resolve(sym)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("<symbol {}>", sym.as_u32()))
    }

    // Arena

    pub fn get(&self, id: ClassId) -> Arc<ClassObject> {
        Arc::clone(&self.classes.read()[id.0])
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    pub(crate) fn alloc(
        &self,
        kind: ClassKind,
        superclass: Option<ClassId>,
        attached: Option<Value>,
        core: bool,
    ) -> ClassId {
        let mut classes = self.classes.write();
        let id = ClassId(classes.len());
        classes.push(Arc::new(ClassObject::new(id, kind, superclass, attached, core)));
        id
    }

    // Definition

    /// Create an anonymous class.
    pub fn new_class(&self, superclass: ClassId) -> RtResult<ClassId> {
        let parent = self.get(superclass);
        match parent.kind {
            ClassKind::Class => {}
            ClassKind::Singleton => {
                return Err(RuntimeError::TypeMismatch(messages::SINGLETON_SUBCLASS.into()));
            }
            ClassKind::Module => {
                return Err(RuntimeError::TypeMismatch(messages::NOT_A_CLASS.into()));
            }
        }
        let id = self.alloc(ClassKind::Class, Some(superclass), None, false);
        let meta = self.metaclass_of(id);
        debug!(class = id.0, superclass = superclass.0, metaclass = meta.0, "class created");
        Ok(id)
    }

    /// Create an anonymous module.
    pub fn new_module(&self) -> ClassId {
        let id = self.alloc(ClassKind::Module, None, None, false);
        self.metaclass_of(id);
        debug!(module = id.0, "module created");
        id
    }

    /// Define or reopen the class `name` under `scope`.
    ///
    /// Reopening requires the existing constant to be a class; a given
    /// superclass must match the one it was created with.
    pub fn define_class(
        &self,
        scope: ClassId,
        name: &str,
        superclass: Option<ClassId>,
    ) -> RtResult<ClassId> {
        let resolver = ConstantResolver::new(self);
        if let Some(existing) = resolver.own(scope, name) {
            let ValueKind::Class(id) = existing.kind() else {
                return Err(RuntimeError::TypeMismatch(format!("{name} is not a class")));
            };
            let class = self.get(id);
            if class.kind != ClassKind::Class {
                return Err(RuntimeError::TypeMismatch(format!("{name} is not a class")));
            }
            if let Some(requested) = superclass {
                if class.superclass() != Some(requested) {
                    return Err(RuntimeError::TypeMismatch(format!(
                        "superclass mismatch for class {name}"
                    )));
                }
            }
            debug!(class = %name, "class reopened");
            return Ok(id);
        }
        let id = self.new_class(superclass.unwrap_or(self.core.object))?;
        resolver.set(scope, name, Value::class(id))?;
        Ok(id)
    }

    /// Define or reopen the module `name` under `scope`.
    pub fn define_module(&self, scope: ClassId, name: &str) -> RtResult<ClassId> {
        let resolver = ConstantResolver::new(self);
        if let Some(existing) = resolver.own(scope, name) {
            if let ValueKind::Class(id) = existing.kind() {
                if self.get(id).is_module() {
                    return Ok(id);
                }
            }
            return Err(RuntimeError::TypeMismatch(format!("{name} is not a module")));
        }
        let id = self.new_module();
        resolver.set(scope, name, Value::class(id))?;
        Ok(id)
    }

    // Metaclasses

    /// Metaclass of a class, module or singleton class, created on first use.
    ///
    /// The metaclass of `C` inherits from the metaclass of `C`'s superclass; the
    /// root's metaclass inherits from `Class`, and a module's from `Module`.
    pub fn metaclass_of(&self, id: ClassId) -> ClassId {
        let class = self.get(id);
        let mut slot = class.singleton_slot().lock();
        if let Some(meta) = *slot {
            return meta;
        }
        let superclass = match (class.kind, class.superclass()) {
            (ClassKind::Module, _) => self.core.module,
            (_, Some(parent)) => self.metaclass_of(parent),
            (_, None) => self.core.class,
        };
        let meta = self.alloc(
            ClassKind::Singleton,
            Some(superclass),
            Some(Value::class(id)),
            class.is_core(),
        );
        *slot = Some(meta);
        debug!(class = id.0, metaclass = meta.0, superclass = superclass.0, "metaclass synthesized");
        meta
    }

    /// Singleton class for a heap object whose class is `class`.
    pub(crate) fn new_object_singleton(&self, attached: Value, class: ClassId) -> ClassId {
        let id = self.alloc(ClassKind::Singleton, Some(class), Some(attached), false);
        debug!(singleton = id.0, class = class.0, "object singleton class created");
        id
    }

    // Hierarchy

    pub fn superclass(&self, id: ClassId) -> Option<ClassId> {
        self.get(id).superclass()
    }

    /// `Class` for classes and singleton classes, `Module` for modules.
    pub fn class_of_class(&self, id: ClassId) -> ClassId {
        if self.get(id).is_module() {
            self.core.module
        } else {
            self.core.class
        }
    }

    /// Method resolution chain: each class's prepended modules (most recent
    /// first), the class, its included modules (most recent first), then the
    /// superclass's chain.
    pub fn ancestors(&self, id: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let class = self.get(c);
            self.push_with_includes(&class, &mut out);
            current = class.superclass();
        }
        out
    }

    fn push_with_includes(&self, class: &ClassObject, out: &mut Vec<ClassId>) {
        for module in class.prepends() {
            let module = self.get(module);
            self.push_with_includes(&module, out);
        }
        if !out.contains(&class.id) {
            out.push(class.id);
        }
        for module in class.includes() {
            let module = self.get(module);
            self.push_with_includes(&module, out);
        }
    }

    pub fn is_kind_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        class == ancestor || self.ancestors(class).contains(&ancestor)
    }

    /// Add `module` to the chain of `class`. Returns false if it was already there.
    pub fn include_module(&self, class: ClassId, module: ClassId) -> RtResult<bool> {
        if !self.get(module).is_module() {
            return Err(RuntimeError::TypeMismatch(messages::NOT_A_MODULE.into()));
        }
        if self.ancestors(class).contains(&module) {
            return Ok(false);
        }
        if self.ancestors(module).contains(&class) {
            return Err(RuntimeError::Argument("cyclic include detected".into()));
        }
        self.get(class).push_include(module);
        debug!(class = class.0, module = module.0, "module included");
        Ok(true)
    }

    /// Put `module` in front of `class` in its own chain. Returns false if it
    /// was already an ancestor.
    pub fn prepend_module(&self, class: ClassId, module: ClassId) -> RtResult<bool> {
        if !self.get(module).is_module() {
            return Err(RuntimeError::TypeMismatch(messages::NOT_A_MODULE.into()));
        }
        if self.ancestors(class).contains(&module) {
            return Ok(false);
        }
        if self.ancestors(module).contains(&class) {
            return Err(RuntimeError::Argument("cyclic prepend detected".into()));
        }
        self.get(class).push_prepend(module);
        debug!(class = class.0, module = module.0, "module prepended");
        Ok(true)
    }

    /// First entry for `name` along the chain. A tombstone ends the search.
    pub fn find_method(&self, class: ClassId, name: Symbol) -> Option<MethodEntry> {
        for ancestor in self.ancestors(class) {
            if let Some(entry) = self.get(ancestor).method(name) {
                return entry.is_defined().then_some(entry);
            }
        }
        None
    }

    // Names

    pub fn display_name(&self, id: ClassId) -> String {
        let class = self.get(id);
        if let Some(name) = class.name() {
            return name;
        }
        match (class.kind, class.attached()) {
            (ClassKind::Singleton, Some(attached)) => match attached.kind() {
                ValueKind::Class(owner) => format!("#<Class:{}>", self.display_name(owner)),
                _ => {
                    let base = class.superclass().map(|c| self.display_name(c));
                    format!(
                        "#<Class:#<{}:0x{:016x}>>",
                        base.unwrap_or_default(),
                        attached.to_bits() & kiln_core::value::PAYLOAD_MASK
                    )
                }
            },
            (ClassKind::Module, _) => format!("#<Module:0x{:016x}>", id.0),
            _ => format!("#<Class:0x{:016x}>", id.0),
        }
    }

    /// Registered name, if the class was ever assigned to a constant.
    pub fn name_of(&self, id: ClassId) -> Option<String> {
        self.get(id).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metaclass_chain_mirrors_class_chain() {
        let graph = ObjectGraph::new();
        let core = *graph.core();
        let a = graph.new_class(core.object).unwrap();
        let b = graph.new_class(a).unwrap();
        let meta_b = graph.metaclass_of(b);
        assert_eq!(graph.superclass(meta_b), Some(graph.metaclass_of(a)));
        let meta_root = graph.metaclass_of(core.basic_object);
        assert_eq!(graph.superclass(meta_root), Some(core.class));
    }

    #[test]
    fn metaclass_is_memoized() {
        let graph = ObjectGraph::new();
        let object = graph.core().object;
        let first = graph.metaclass_of(object);
        let second = graph.metaclass_of(object);
        assert_eq!(first, second);
        let meta_meta = graph.metaclass_of(first);
        assert_eq!(meta_meta, graph.metaclass_of(first));
    }

    #[test]
    fn modules_cannot_be_subclassed() {
        let graph = ObjectGraph::new();
        let kernel = graph.core().kernel;
        assert!(matches!(graph.new_class(kernel), Err(RuntimeError::TypeMismatch(_))));
    }

    #[test]
    fn cyclic_include_is_rejected() {
        let graph = ObjectGraph::new();
        let a = graph.new_module();
        let b = graph.new_module();
        assert!(graph.include_module(a, b).unwrap());
        assert!(matches!(graph.include_module(b, a), Err(RuntimeError::Argument(_))));
    }

    #[test]
    fn object_includes_kernel() {
        let graph = ObjectGraph::new();
        let core = *graph.core();
        assert_eq!(
            graph.ancestors(core.object),
            vec![core.object, core.kernel, core.basic_object]
        );
    }
}
