//! `nil`, `true` and `false`.

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::RtResult;
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    for class in [core.nil_class, core.true_class, core.false_class] {
        registry.register(class, "to_s", to_s);
        registry.register(class, "inspect", inspect);
        registry.register(class, "&", and);
        registry.register(class, "|", or);
    }
    registry.register(core.nil_class, "nil?", is_nil);
    registry.register(core.nil_class, "to_a", to_a);
}

fn to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = rt.to_s(recv);
    Ok(rt.new_string(s))
}

fn inspect(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = rt.inspect(recv);
    Ok(rt.new_string(s))
}

fn and(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    Ok(Value::from_bool(recv.is_truthy() && args[0].is_truthy()))
}

fn or(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    Ok(Value::from_bool(recv.is_truthy() || args[0].is_truthy()))
}

fn is_nil(_rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::TRUE)
}

fn to_a(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.new_array(Vec::new()))
}
