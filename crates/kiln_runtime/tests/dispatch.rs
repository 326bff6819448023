mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use kiln_runtime::{RuntimeError, Value, Visibility};

#[test]
fn singleton_method_is_invisible_to_siblings() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let a = rt.instantiate(foo, &[]).unwrap();
    let b = rt.instantiate(foo, &[]).unwrap();
    rt.define_singleton_method(a, "only_me", |_, _, _| Ok(Value::from_i64(7)))
        .unwrap();
    assert_eq!(call(&mut rt, a, "only_me", &[]), Value::from_i64(7));
    let err = try_call(&mut rt, b, "only_me", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NoSuchMethod { ref name, .. } if name == "only_me"));
}

#[test]
fn singleton_methods_shadow_class_methods() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    rt.define_method(foo, "who", |rt, _, _| Ok(rt.new_string("class")))
        .unwrap();
    let obj = rt.instantiate(foo, &[]).unwrap();
    rt.define_singleton_method(obj, "who", |rt, _, _| Ok(rt.new_string("singleton")))
        .unwrap();
    let who = call(&mut rt, obj, "who", &[]);
    assert_eq!(string(&rt, who), "singleton");
}

#[test]
fn method_missing_receives_name_first() {
    let mut rt = runtime();
    let ghost = class(&rt, "Ghost", Some(rt.core().basic_object));
    rt.define_method(ghost, "method_missing", |rt, _, args| {
        let name = rt.symbol_name(args[0].as_symbol());
        Ok(rt.new_string(format!("{name}/{}", args.len() - 1)))
    })
    .unwrap();
    let obj = rt.instantiate(ghost, &[]).unwrap();
    let out = call(&mut rt, obj, "anything", &[Value::from_i64(1), Value::from_i64(2)]);
    assert_eq!(string(&rt, out), "anything/2");
}

#[test]
fn removing_method_missing_restores_no_method_error() {
    let mut rt = runtime();
    let ghost = class(&rt, "Ghost", Some(rt.core().basic_object));
    rt.define_method(ghost, "method_missing", |_, _, _| Ok(Value::TRUE))
        .unwrap();
    let obj = rt.instantiate(ghost, &[]).unwrap();
    assert_eq!(call(&mut rt, obj, "whatever", &[]), Value::TRUE);

    let ghost_value = Value::class(ghost);
    let name = rt.symbol("method_missing");
    call(&mut rt, ghost_value, "remove_method", &[name]);

    let err = try_call(&mut rt, obj, "whatever", &[]).unwrap_err();
    assert_eq!(err.class_name(), "NoMethodError");
    assert!(matches!(err, RuntimeError::NoSuchMethod { ref name, .. } if name == "whatever"));
}

#[test]
fn undefined_method_hides_inherited_definition() {
    let mut rt = runtime();
    let base = class(&rt, "Base", None);
    let child = class(&rt, "Child", Some(base));
    rt.define_method(base, "greet", |_, _, _| Ok(Value::from_i64(1)))
        .unwrap();
    let obj = rt.instantiate(child, &[]).unwrap();
    assert_eq!(call(&mut rt, obj, "greet", &[]), Value::from_i64(1));

    rt.undef_method(child, "greet").unwrap();
    assert!(try_call(&mut rt, obj, "greet", &[]).is_err());
    assert!(!rt.respond_to(obj, "greet", true));
    // base instances are unaffected
    let base_obj = rt.instantiate(base, &[]).unwrap();
    assert_eq!(call(&mut rt, base_obj, "greet", &[]), Value::from_i64(1));
}

#[test]
fn remove_method_exposes_inherited_definition() {
    let mut rt = runtime();
    let base = class(&rt, "Base", None);
    let child = class(&rt, "Child", Some(base));
    rt.define_method(base, "v", |_, _, _| Ok(Value::from_i64(1))).unwrap();
    rt.define_method(child, "v", |_, _, _| Ok(Value::from_i64(2))).unwrap();
    let obj = rt.instantiate(child, &[]).unwrap();
    assert_eq!(call(&mut rt, obj, "v", &[]), Value::from_i64(2));
    rt.remove_method(child, "v").unwrap();
    assert_eq!(call(&mut rt, obj, "v", &[]), Value::from_i64(1));

    let err = rt.remove_method(child, "v").unwrap_err();
    assert_eq!(
        err,
        RuntimeError::MethodNotDefined {
            name: "v".into(),
            owner: "Child".into()
        }
    );
    assert!(rt.undef_method(child, "never_defined").is_err());
}

#[test]
fn redefinition_applies_to_the_next_call() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    rt.define_method(foo, "step", move |rt, recv, _| {
        seen.fetch_add(1, Ordering::SeqCst);
        let class = rt.class_of(recv);
        rt.define_method(class, "step", |_, _, _| Ok(Value::from_i64(2)))?;
        Ok(Value::from_i64(1))
    })
    .unwrap();
    let obj = rt.instantiate(foo, &[]).unwrap();
    assert_eq!(call(&mut rt, obj, "step", &[]), Value::from_i64(1));
    assert_eq!(call(&mut rt, obj, "step", &[]), Value::from_i64(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn private_methods_need_send() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    rt.define_method(foo, "secret", |_, _, _| Ok(Value::from_i64(42)))
        .unwrap();
    rt.set_visibility(foo, "secret", Visibility::Private).unwrap();
    let obj = rt.instantiate(foo, &[]).unwrap();
    let err = try_call(&mut rt, obj, "secret", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::PrivateMethod { .. }));
    assert_eq!(rt.send(obj, "secret", &[]).unwrap(), Value::from_i64(42));
    assert!(!rt.respond_to(obj, "secret", false));
    assert!(rt.respond_to(obj, "secret", true));
    assert!(!rt.method_defined(foo, "secret"));
}

#[test]
fn method_missing_is_private_on_basic_object() {
    let mut rt = runtime();
    let obj = rt.instantiate(rt.core().object, &[]).unwrap();
    let name = rt.symbol("nope");
    let err = try_call(&mut rt, obj, "method_missing", &[name]).unwrap_err();
    assert!(matches!(err, RuntimeError::PrivateMethod { .. }));
    let err = rt.send(obj, "method_missing", &[name]).unwrap_err();
    assert!(matches!(err, RuntimeError::NoSuchMethod { ref name, .. } if name == "nope"));
}

#[test]
fn included_modules_come_before_superclass() {
    let mut rt = runtime();
    let object = rt.core().object;
    let greeter = rt.define_module(object, "Greeter").unwrap();
    rt.define_method(greeter, "hello", |rt, _, _| Ok(rt.new_string("module")))
        .unwrap();
    let base = class(&rt, "Base", None);
    rt.define_method(base, "hello", |rt, _, _| Ok(rt.new_string("base")))
        .unwrap();
    let child = class(&rt, "Child", Some(base));
    rt.include_module(child, greeter).unwrap();
    assert_eq!(&rt.ancestors(child)[..3], &[child, greeter, base]);
    let obj = rt.instantiate(child, &[]).unwrap();
    let out = call(&mut rt, obj, "hello", &[]);
    assert_eq!(string(&rt, out), "module");
}

#[test]
fn alias_keeps_old_body() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    rt.define_method(foo, "a", |_, _, _| Ok(Value::from_i64(1))).unwrap();
    rt.alias_method(foo, "b", "a").unwrap();
    rt.define_method(foo, "a", |_, _, _| Ok(Value::from_i64(2))).unwrap();
    let obj = rt.instantiate(foo, &[]).unwrap();
    assert_eq!(call(&mut rt, obj, "b", &[]), Value::from_i64(1));
    assert_eq!(call(&mut rt, obj, "a", &[]), Value::from_i64(2));
}

#[test]
fn frozen_objects_reject_singleton_methods_and_ivars() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let obj = rt.instantiate(foo, &[]).unwrap();
    rt.freeze(obj);
    let err = rt
        .define_singleton_method(obj, "x", |_, _, _| Ok(Value::NIL))
        .unwrap_err();
    assert_eq!(err.class_name(), "FrozenError");
    assert!(rt.ivar_set(obj, "@a", Value::from_i64(1)).is_err());
    assert!(matches!(
        rt.ivar_get(obj, "bad"),
        Err(RuntimeError::InvalidIvarName(_))
    ));
}

#[test]
fn comparable_uses_spaceship() {
    let mut rt = runtime();
    let a = rt.new_string("apple");
    let b = rt.new_string("banana");
    assert_eq!(call(&mut rt, a, "<", &[b]), Value::TRUE);
    assert_eq!(call(&mut rt, b, "between?", &[a, b]), Value::TRUE);
    let three = Value::from_i64(3);
    let clamped = call(&mut rt, three, "clamp", &[Value::from_i64(5), Value::from_i64(9)]);
    assert_eq!(clamped, Value::from_i64(5));
    let err = try_call(&mut rt, a, "<", &[three]).unwrap_err();
    assert_eq!(err.class_name(), "ArgumentError");
}

#[test]
fn kernel_reflection_builtins() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let obj = rt.instantiate(foo, &[]).unwrap();
    let ivar = rt.new_string("@test");
    call(&mut rt, obj, "instance_variable_set", &[ivar, Value::from_i64(5)]);
    assert_eq!(
        call(&mut rt, obj, "instance_variable_get", &[ivar]),
        Value::from_i64(5)
    );
    let names = call(&mut rt, obj, "instance_variables", &[]);
    assert_eq!(symbol_names(&rt, names), vec!["@test"]);
    let foo_value = Value::class(foo);
    assert_eq!(call(&mut rt, obj, "is_a?", &[foo_value]), Value::TRUE);
    let object = Value::class(rt.core().object);
    assert_eq!(call(&mut rt, obj, "instance_of?", &[object]), Value::FALSE);
    assert_eq!(call(&mut rt, foo_value, "===", &[obj]), Value::TRUE);
    let inspected = call(&mut rt, obj, "inspect", &[]);
    assert!(string(&rt, inspected).contains("@test=5"));
}

#[test]
fn object_ids_stay_distinct_at_the_integer_edges() {
    let mut rt = runtime();
    let max = Value::from_i64(kiln_core::value::INT_MAX);
    let minus_one = Value::from_i64(-1);
    let id_max = call(&mut rt, max, "object_id", &[]);
    let id_minus_one = call(&mut rt, minus_one, "object_id", &[]);
    assert_ne!(id_max, id_minus_one);
    assert_eq!(id_minus_one, Value::from_i64(-1));
    assert_eq!(call(&mut rt, max, "object_id", &[]), id_max);
    assert_eq!(call(&mut rt, max, "hash", &[]), id_max);
    assert_eq!(call(&mut rt, max, "__id__", &[]), id_max);

    let min = Value::from_i64(kiln_core::value::INT_MIN);
    let id_min = call(&mut rt, min, "object_id", &[]);
    assert_ne!(id_min, id_max);
    assert_eq!(id_min.as_f64(), 2.0 * kiln_core::value::INT_MIN as f64 + 1.0);
}

#[test]
fn unknown_names_are_not_interned() {
    let mut rt = runtime();
    let foo = class(&rt, "Foo", None);
    let obj = rt.instantiate(foo, &[]).unwrap();
    let err = try_call(&mut rt, obj, "never_seen_before", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::NoSuchMethod { ref name, .. } if name == "never_seen_before"));
    let err = rt.send(obj, "also_never_seen", &[]).unwrap_err();
    assert_eq!(err.class_name(), "NoMethodError");
    assert!(rt.graph().lookup_symbol("never_seen_before").is_none());
    assert!(rt.graph().lookup_symbol("also_never_seen").is_none());

    rt.define_method(foo, "method_missing", |rt, _, args| {
        let name = rt.symbol_name(args[0].as_symbol());
        Ok(rt.new_string(name))
    })
    .unwrap();
    let out = call(&mut rt, obj, "first_time_name", &[]);
    assert_eq!(string(&rt, out), "first_time_name");
    assert!(rt.graph().lookup_symbol("first_time_name").is_some());
}

#[test]
fn prepended_modules_come_before_the_class() {
    let mut rt = runtime();
    let object = rt.core().object;
    let loud = rt.define_module(object, "Loud").unwrap();
    let polite = rt.define_module(object, "Polite").unwrap();
    rt.define_method(loud, "hello", |rt, _, _| Ok(rt.new_string("loud")))
        .unwrap();
    let quiet = class(&rt, "Quiet", None);
    rt.define_method(quiet, "hello", |rt, _, _| Ok(rt.new_string("quiet")))
        .unwrap();
    let quiet_value = Value::class(quiet);
    call(
        &mut rt,
        quiet_value,
        "prepend",
        &[Value::class(loud), Value::class(polite)],
    );
    assert_eq!(&rt.ancestors(quiet)[..3], &[loud, polite, quiet]);
    let obj = rt.instantiate(quiet, &[]).unwrap();
    let out = call(&mut rt, obj, "hello", &[]);
    assert_eq!(string(&rt, out), "loud");

    // a second prepend of an ancestor changes nothing
    let before = rt.ancestors(quiet);
    assert_eq!(rt.prepend_module(quiet, polite), Ok(false));
    assert_eq!(rt.ancestors(quiet), before);

    let sub = class(&rt, "Sub", Some(quiet));
    assert_eq!(&rt.ancestors(sub)[..4], &[sub, loud, polite, quiet]);

    let err = try_call(&mut rt, quiet_value, "prepend", &[Value::class(sub)]).unwrap_err();
    assert_eq!(err.class_name(), "TypeError");
}

#[test]
fn attribute_builtins_read_and_write_ivars() {
    let mut rt = runtime();
    let point = class(&rt, "Point", None);
    let point_value = Value::class(point);
    let x = rt.symbol("x");
    let y = rt.new_string("y");
    let defined = call(&mut rt, point_value, "attr_accessor", &[x]);
    assert_eq!(symbol_names(&rt, defined), vec!["x", "x="]);
    call(&mut rt, point_value, "attr_reader", &[y]);

    let obj = rt.instantiate(point, &[]).unwrap();
    assert!(call(&mut rt, obj, "x", &[]).is_nil());
    assert_eq!(call(&mut rt, obj, "x=", &[Value::from_i64(3)]), Value::from_i64(3));
    assert_eq!(call(&mut rt, obj, "x", &[]), Value::from_i64(3));
    assert_eq!(rt.ivar_get(obj, "@x"), Ok(Some(Value::from_i64(3))));

    rt.ivar_set(obj, "@y", Value::TRUE).unwrap();
    assert_eq!(call(&mut rt, obj, "y", &[]), Value::TRUE);
    let err = try_call(&mut rt, obj, "y=", &[Value::FALSE]).unwrap_err();
    assert_eq!(err.class_name(), "NoMethodError");

    let bad = rt.new_string("1x");
    let err = try_call(&mut rt, point_value, "attr_writer", &[bad]).unwrap_err();
    assert_eq!(err.class_name(), "NameError");
    let err = try_call(&mut rt, point_value, "attr_reader", &[Value::from_i64(1)]).unwrap_err();
    assert_eq!(err.to_string(), "1 is not a symbol nor a string");
}
