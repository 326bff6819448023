#![allow(dead_code)]

use kiln_runtime::{ClassId, RtResult, Runtime, Value};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn runtime() -> Runtime {
    init_tracing();
    Runtime::new()
}

/// `class Name < Super; end` at the top level.
pub fn class(rt: &Runtime, name: &str, superclass: Option<ClassId>) -> ClassId {
    let object = rt.core().object;
    rt.define_class(object, name, superclass).unwrap()
}

pub fn call(rt: &mut Runtime, recv: Value, name: &str, args: &[Value]) -> Value {
    rt.invoke(recv, name, args)
        .unwrap_or_else(|e| panic!("{name} failed: {e}"))
}

pub fn try_call(rt: &mut Runtime, recv: Value, name: &str, args: &[Value]) -> RtResult<Value> {
    rt.invoke(recv, name, args)
}

pub fn string(rt: &Runtime, value: Value) -> String {
    rt.str_of(value)
        .unwrap_or_else(|| panic!("expected a String, got {}", rt.inspect(value)))
        .to_string()
}

pub fn array(rt: &Runtime, value: Value) -> Vec<Value> {
    rt.array_of(value)
        .unwrap_or_else(|| panic!("expected an Array, got {}", rt.inspect(value)))
        .to_vec()
}

pub fn symbol_names(rt: &Runtime, value: Value) -> Vec<String> {
    array(rt, value)
        .into_iter()
        .map(|v| rt.symbol_name(v.as_symbol()))
        .collect()
}
