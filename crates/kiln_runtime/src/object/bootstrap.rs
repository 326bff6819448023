//! Construction of the core class graph.
//!
//! `BasicObject`, `Object`, `Module` and `Class` reference each other, so they
//! are allocated first and their metaclasses synthesized only once all four
//! exist. The metaclass of `BasicObject` inherits from `Class`, which closes
//! the loop: `Class` is an instance of itself.

use tracing::debug;

use crate::core::{ClassId, Value};

use super::class::ClassKind;
use super::graph::ObjectGraph;

impl ObjectGraph {
    pub fn new() -> Self {
        let mut graph = Self::empty();

        let basic_object = graph.alloc(ClassKind::Class, None, None, true);
        let object = graph.alloc(ClassKind::Class, Some(basic_object), None, true);
        let module = graph.alloc(ClassKind::Class, Some(object), None, true);
        let class = graph.alloc(ClassKind::Class, Some(module), None, true);
        graph.core.basic_object = basic_object;
        graph.core.object = object;
        graph.core.module = module;
        graph.core.class = class;

        graph.core.kernel = graph.alloc(ClassKind::Module, None, None, true);
        graph.core.comparable = graph.alloc(ClassKind::Module, None, None, true);
        graph.get(object).push_include(graph.core.kernel);

        let subclass_of_object = |graph: &ObjectGraph| {
            graph.alloc(ClassKind::Class, Some(object), None, true)
        };
        graph.core.nil_class = subclass_of_object(&graph);
        graph.core.true_class = subclass_of_object(&graph);
        graph.core.false_class = subclass_of_object(&graph);
        graph.core.integer = subclass_of_object(&graph);
        graph.core.float = subclass_of_object(&graph);
        graph.core.string = subclass_of_object(&graph);
        graph.core.symbol = subclass_of_object(&graph);
        graph.core.array = subclass_of_object(&graph);
        graph.core.encoding = subclass_of_object(&graph);
        for comparable_class in [graph.core.integer, graph.core.float, graph.core.string] {
            graph.get(comparable_class).push_include(graph.core.comparable);
        }

        let core = graph.core;
        let named: [(ClassId, &str); 15] = [
            (core.basic_object, "BasicObject"),
            (core.object, "Object"),
            (core.module, "Module"),
            (core.class, "Class"),
            (core.kernel, "Kernel"),
            (core.comparable, "Comparable"),
            (core.nil_class, "NilClass"),
            (core.true_class, "TrueClass"),
            (core.false_class, "FalseClass"),
            (core.integer, "Integer"),
            (core.float, "Float"),
            (core.string, "String"),
            (core.symbol, "Symbol"),
            (core.array, "Array"),
            (core.encoding, "Encoding"),
        ];
        for (id, name) in named {
            graph.metaclass_of(id);
            let class = graph.get(id);
            class.set_name(name.to_string());
            class.set_owner(core.object);
            let sym = graph.intern(name);
            graph.get(core.object).put_constant(sym, Value::class(id));
        }
        // The root names itself so that `BasicObject::BasicObject` resolves
        // without reaching `Object`.
        let root_name = graph.intern("BasicObject");
        graph
            .get(core.basic_object)
            .put_constant(root_name, Value::class(core.basic_object));

        debug!(classes = graph.len(), "core class graph bootstrapped");
        graph
    }
}

impl Default for ObjectGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_is_its_own_class() {
        let graph = ObjectGraph::new();
        let core = *graph.core();
        assert_eq!(graph.class_of_class(core.class), core.class);
        let meta_class = graph.metaclass_of(core.class);
        assert_eq!(graph.superclass(meta_class), Some(graph.metaclass_of(core.module)));
    }

    #[test]
    fn core_classes_are_named_and_registered() {
        let graph = ObjectGraph::new();
        let core = *graph.core();
        assert_eq!(graph.name_of(core.basic_object).as_deref(), Some("BasicObject"));
        let sym = graph.lookup_symbol("Encoding").unwrap();
        assert_eq!(
            graph.get(core.object).constant(sym),
            Some(Value::class(core.encoding))
        );
        assert!(graph.get(core.string).is_core());
        assert!(graph.get(graph.metaclass_of(core.string)).is_core());
    }
}
