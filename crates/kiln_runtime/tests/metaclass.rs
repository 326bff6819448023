mod common;

use common::*;
use kiln_runtime::{ClassKind, RuntimeConfig, RuntimeError, Value};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

#[test]
fn basic_object_metaclass_inherits_from_class() {
    let mut rt = runtime();
    let core = rt.core();
    let meta = rt.singleton_class_of(Value::class(core.basic_object)).unwrap();
    assert_eq!(rt.graph().superclass(meta), Some(core.class));
    // through the builtin as well
    let meta_value = call(&mut rt, Value::class(core.basic_object), "singleton_class", &[]);
    let sup = call(&mut rt, meta_value, "superclass", &[]);
    assert_eq!(sup, Value::class(core.class));
}

#[test]
fn instance_singleton_inherits_from_its_class() {
    let mut rt = runtime();
    let core = rt.core();
    let obj = rt.instantiate(core.basic_object, &[]).unwrap();
    let singleton = rt.singleton_class_of(obj).unwrap();
    assert_eq!(rt.graph().superclass(singleton), Some(core.basic_object));
    assert_eq!(rt.singleton_class_of(obj).unwrap(), singleton);
    assert_eq!(rt.class_of(obj), core.basic_object);
}

#[test]
fn class_is_an_instance_of_itself() {
    let mut rt = runtime();
    let core = rt.core();
    let class_of_class = call(&mut rt, Value::class(core.class), "class", &[]);
    assert_eq!(class_of_class, Value::class(core.class));
    let kernel_class = call(&mut rt, Value::class(core.kernel), "class", &[]);
    assert_eq!(kernel_class, Value::class(core.module));
}

#[test]
fn metaclass_of_metaclass_is_stable() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let meta = rt.singleton_class_of(Value::class(foo)).unwrap();
    let meta_meta = rt.singleton_class_of(Value::class(meta)).unwrap();
    assert_eq!(rt.singleton_class_of(Value::class(meta)).unwrap(), meta_meta);
    let object_meta = rt.singleton_class_of(Value::class(rt.core().object)).unwrap();
    let object_meta_meta = rt.singleton_class_of(Value::class(object_meta)).unwrap();
    assert_eq!(rt.graph().superclass(meta_meta), Some(object_meta_meta));
    assert_eq!(rt.graph().display_name(meta_meta), "#<Class:#<Class:Foo>>");
}

#[test]
fn singleton_classes_render_their_owner() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let meta = rt.singleton_class_of(Value::class(foo)).unwrap();
    assert_eq!(rt.graph().display_name(meta), "#<Class:Foo>");
    assert_eq!(rt.graph().name_of(meta), None);
    let obj = rt.instantiate(foo, &[]).unwrap();
    let singleton = rt.singleton_class_of(obj).unwrap();
    assert!(rt.graph().display_name(singleton).starts_with("#<Class:#<Foo:0x"));
}

#[test]
fn singleton_classes_cannot_be_instantiated_or_subclassed() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let meta = rt.singleton_class_of(Value::class(foo)).unwrap();
    let err = try_call(&mut rt, Value::class(meta), "new", &[]).unwrap_err();
    assert_eq!(err.class_name(), "TypeError");
    assert!(matches!(rt.new_class(meta), Err(RuntimeError::TypeMismatch(_))));
    assert_eq!(rt.graph().get(meta).kind, ClassKind::Singleton);
}

#[test]
fn immediates_have_no_singleton_class() {
    let mut rt = runtime();
    let core = rt.core();
    assert!(rt.singleton_class_of(Value::from_i64(1)).is_err());
    let sym = rt.symbol("sym");
    assert!(rt.singleton_class_of(sym).is_err());
    assert_eq!(rt.singleton_class_of(Value::NIL).unwrap(), core.nil_class);
    assert_eq!(rt.singleton_class_of(Value::TRUE).unwrap(), core.true_class);
}

#[test]
fn sealed_core_still_answers_metaclasses() {
    let config = RuntimeConfig {
        seal_core_classes: true,
        ..RuntimeConfig::default()
    };
    let mut rt = kiln_runtime::Runtime::with_config(config).unwrap();
    let core = rt.core();
    let meta = rt.singleton_class_of(Value::class(core.basic_object)).unwrap();
    let err = rt
        .define_method(meta, "shout", |_, _, _| Ok(Value::NIL))
        .unwrap_err();
    assert_eq!(err.class_name(), "FrozenError");
    let err = rt.remove_method(core.basic_object, "==").unwrap_err();
    assert_eq!(err.class_name(), "FrozenError");
    // user classes stay open
    let foo = class(&rt, "Foo", None);
    rt.define_method(foo, "ok", |_, _, _| Ok(Value::TRUE)).unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32, max_shrink_iters: 200, .. ProptestConfig::default()
    })]

    /// Each new class picks a random earlier class (or Object) as parent.
    #[test]
    fn metaclass_chain_mirrors_class_chain(parents in proptest::collection::vec(any::<prop::sample::Index>(), 1..24)) {
        let rt = kiln_runtime::Runtime::new();
        let graph = rt.graph();
        let mut classes = vec![rt.core().object];
        for parent in parents {
            let parent = classes[parent.index(classes.len())];
            classes.push(graph.new_class(parent).unwrap());
        }
        for &class in &classes {
            let meta = graph.metaclass_of(class);
            let expected = graph.superclass(class).map(|sup| graph.metaclass_of(sup));
            prop_assert_eq!(graph.superclass(meta), expected);
            prop_assert_eq!(graph.metaclass_of(class), meta);
        }
    }
}
