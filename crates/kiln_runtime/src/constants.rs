//! Constant tables and constant lookup.
//!
//! Lexical scoping is not modeled: a non-own lookup walks the ancestor chain of
//! the class, and modules additionally fall back to `Object`. A class that does
//! not inherit from `Object` (such as `BasicObject`) therefore never sees the
//! top-level constants.

use tracing::{debug, warn};

use crate::core::{ClassId, FastIndexSet, Symbol, Value, ValueKind, fast_index_set_new};
use crate::errors::{RtResult, RuntimeError};
use crate::object::{ConstEntry, ObjectGraph};
use crate::object::names::is_constant_name;

pub struct ConstantResolver<'g> {
    graph: &'g ObjectGraph,
}

impl<'g> ConstantResolver<'g> {
    pub fn new(graph: &'g ObjectGraph) -> Self {
        Self { graph }
    }

    /// Only the class's own table.
    pub fn own(&self, class: ClassId, name: &str) -> Option<Value> {
        let sym = self.graph.lookup_symbol(name)?;
        self.graph.get(class).constant(sym)
    }

    pub fn resolve(&self, class: ClassId, name: &str, own_only: bool) -> Option<Value> {
        self.resolve_entry(class, name, own_only)
            .map(|(_, entry)| entry.value)
    }

    /// Like `resolve`, but also reports the class whose table held the entry.
    pub fn resolve_entry(
        &self,
        class: ClassId,
        name: &str,
        own_only: bool,
    ) -> Option<(ClassId, ConstEntry)> {
        let sym = self.graph.lookup_symbol(name)?;
        if own_only {
            return self.graph.get(class).constant_entry(sym).map(|e| (class, e));
        }
        let ancestors = self.graph.ancestors(class);
        for &ancestor in &ancestors {
            if let Some(entry) = self.graph.get(ancestor).constant_entry(sym) {
                return Some((ancestor, entry));
            }
        }
        let object = self.graph.core().object;
        if self.graph.get(class).is_module() && !ancestors.contains(&object) {
            return self.graph.get(object).constant_entry(sym).map(|e| (object, e));
        }
        None
    }

    /// Strict getter, as used for `Scope::NAME`. A miss or a private entry is
    /// a `NameError`; a deprecated entry is logged.
    pub fn get(&self, class: ClassId, name: &str) -> RtResult<Value> {
        if !is_constant_name(name) {
            return Err(RuntimeError::InvalidConstantName(name.to_string()));
        }
        let Some((owner, entry)) = self.resolve_entry(class, name, false) else {
            return Err(RuntimeError::NameError {
                scope: self.graph.display_name(class),
                name: name.to_string(),
            });
        };
        if entry.private {
            return Err(RuntimeError::PrivateConstant {
                scope: self.qualifier(owner),
                name: name.to_string(),
            });
        }
        if entry.deprecated {
            warn!(scope = %self.qualifier(owner), constant = %name, "deprecated constant referenced");
        }
        Ok(entry.value)
    }

    fn qualifier(&self, owner: ClassId) -> String {
        if owner == self.graph.core().object {
            String::new()
        } else {
            self.graph.display_name(owner)
        }
    }

    pub fn is_defined(&self, class: ClassId, name: &str, inherit: bool) -> RtResult<bool> {
        if !is_constant_name(name) {
            return Err(RuntimeError::InvalidConstantName(name.to_string()));
        }
        Ok(self.resolve(class, name, !inherit).is_some())
    }

    /// Assign a constant. An unnamed class or module assigned here takes the
    /// constant's name, qualified by `scope` unless `scope` is `Object`.
    pub fn set(&self, scope: ClassId, name: &str, value: Value) -> RtResult<Value> {
        if !is_constant_name(name) {
            return Err(RuntimeError::InvalidConstantName(name.to_string()));
        }
        let sym = self.graph.intern(name);
        let target = self.graph.get(scope);
        if target.put_constant(sym, value).is_some() {
            warn!(scope = %self.graph.display_name(scope), constant = %name, "already initialized constant");
        }
        if let ValueKind::Class(id) = value.kind() {
            let class = self.graph.get(id);
            if class.name().is_none() && !class.is_singleton() {
                let qualified = if scope == self.graph.core().object {
                    name.to_string()
                } else {
                    format!("{}::{}", self.graph.display_name(scope), name)
                };
                class.set_owner(scope);
                class.set_name(qualified);
            }
        }
        debug!(scope = scope.0, constant = %name, "constant set");
        Ok(value)
    }

    /// Flip the private flag of an own constant.
    pub fn set_private(&self, scope: ClassId, name: &str, private: bool) -> RtResult<()> {
        let found = self
            .graph
            .lookup_symbol(name)
            .is_some_and(|sym| self.graph.get(scope).set_constant_private(sym, private));
        if !found {
            return Err(self.not_defined(scope, name));
        }
        debug!(scope = scope.0, constant = %name, private, "constant visibility");
        Ok(())
    }

    pub fn deprecate(&self, scope: ClassId, name: &str) -> RtResult<()> {
        let found = self
            .graph
            .lookup_symbol(name)
            .is_some_and(|sym| self.graph.get(scope).deprecate_constant(sym));
        if !found {
            return Err(self.not_defined(scope, name));
        }
        Ok(())
    }

    fn not_defined(&self, scope: ClassId, name: &str) -> RuntimeError {
        RuntimeError::ConstantNotDefined {
            scope: self.graph.display_name(scope),
            name: name.to_string(),
        }
    }

    pub fn remove(&self, scope: ClassId, name: &str) -> Option<Value> {
        let sym = self.graph.lookup_symbol(name)?;
        self.graph.get(scope).take_constant(sym)
    }

    /// Names registered directly on `class`, in insertion order.
    pub fn own_constants(&self, class: ClassId) -> FastIndexSet<Symbol> {
        self.graph.get(class).constant_names().into_iter().collect()
    }

    /// Public own names plus those of every ancestor except `Object` and what
    /// lies above it, unless `class` is `Object` itself.
    pub fn constants(&self, class: ClassId, inherit: bool) -> FastIndexSet<Symbol> {
        let mut out = fast_index_set_new();
        out.extend(self.graph.get(class).public_constant_names());
        if !inherit {
            return out;
        }
        let object = self.graph.core().object;
        for ancestor in self.graph.ancestors(class) {
            if ancestor == class {
                continue;
            }
            if ancestor == object && class != object {
                break;
            }
            out.extend(self.graph.get(ancestor).public_constant_names());
        }
        out
    }

    pub fn names(&self, set: &FastIndexSet<Symbol>) -> Vec<String> {
        set.iter().map(|s| self.graph.symbol_name(*s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_does_not_see_top_level_constants() {
        let graph = ObjectGraph::new();
        let resolver = ConstantResolver::new(&graph);
        let root = graph.core().basic_object;
        assert!(resolver.resolve(root, "Kernel", false).is_none());
        assert!(resolver.resolve(root, "BasicObject", true).is_some());
    }

    #[test]
    fn modules_fall_back_to_object() {
        let graph = ObjectGraph::new();
        let resolver = ConstantResolver::new(&graph);
        let m = graph.new_module();
        assert_eq!(
            resolver.resolve(m, "String", false),
            Some(Value::class(graph.core().string))
        );
        assert!(resolver.resolve(m, "String", true).is_none());
    }

    #[test]
    fn assigning_names_anonymous_classes() {
        let graph = ObjectGraph::new();
        let resolver = ConstantResolver::new(&graph);
        let outer = graph.define_module(graph.core().object, "Outer").unwrap();
        let inner = graph.new_class(graph.core().object).unwrap();
        resolver.set(outer, "Inner", Value::class(inner)).unwrap();
        assert_eq!(graph.name_of(inner).as_deref(), Some("Outer::Inner"));
        // a second assignment does not rename
        resolver.set(graph.core().object, "Alias", Value::class(inner)).unwrap();
        assert_eq!(graph.name_of(inner).as_deref(), Some("Outer::Inner"));
    }

    #[test]
    fn lowercase_names_are_rejected() {
        let graph = ObjectGraph::new();
        let resolver = ConstantResolver::new(&graph);
        let err = resolver.set(graph.core().object, "lower", Value::NIL).unwrap_err();
        assert_eq!(err, RuntimeError::InvalidConstantName("lower".into()));
    }
}
