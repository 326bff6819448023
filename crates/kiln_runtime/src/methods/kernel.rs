use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::RtResult;
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let k = core.kernel;
    registry.register(k, "class", class);
    registry.register(k, "singleton_class", singleton_class);
    registry.register(k, "hash", object_id);
    registry.register(k, "object_id", object_id);
    registry.register(k, "send", send);
    registry.register(k, "public_send", public_send);
    registry.register(k, "respond_to?", respond_to);
    registry.register(k, "instance_variable_get", ivar_get);
    registry.register(k, "instance_variable_set", ivar_set);
    registry.register(k, "instance_variables", ivars);
    registry.register(k, "frozen?", frozen);
    registry.register(k, "freeze", freeze);
    registry.register(k, "is_a?", is_a);
    registry.register(k, "kind_of?", is_a);
    registry.register(k, "instance_of?", instance_of);
    registry.register(k, "inspect", inspect);
    registry.register(k, "to_s", to_s);
    registry.register(k, "nil?", nil);
}

fn class(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::class(rt.class_of(recv)))
}

fn singleton_class(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    rt.singleton_class_of(recv).map(Value::class)
}

fn object_id(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.object_id(recv))
}

fn send(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, usize::MAX)?;
    let name = expect_name(rt, args[0])?;
    rt.send(recv, &name, &args[1..])
}

fn public_send(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, usize::MAX)?;
    let name = expect_name(rt, args[0])?;
    rt.invoke(recv, &name, &args[1..])
}

fn respond_to(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 2)?;
    let name = expect_name(rt, args[0])?;
    let include_private = arg(args, 1).is_truthy();
    Ok(Value::from_bool(rt.respond_to(recv, &name, include_private)))
}

fn ivar_get(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let name = expect_name(rt, args[0])?;
    Ok(rt.ivar_get(recv, &name)?.unwrap_or(Value::NIL))
}

fn ivar_set(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 2, 2)?;
    let name = expect_name(rt, args[0])?;
    rt.ivar_set(recv, &name, args[1])
}

fn ivars(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let names = rt.ivar_names(recv).into_iter().map(Value::symbol).collect();
    Ok(rt.new_array(names))
}

fn frozen(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::from_bool(rt.is_frozen(recv)))
}

fn freeze(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.freeze(recv))
}

fn is_a(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let class = expect_class(rt, args[0])?;
    Ok(Value::from_bool(rt.is_a(recv, class)))
}

fn instance_of(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let class = expect_class(rt, args[0])?;
    Ok(Value::from_bool(rt.class_of(recv) == class))
}

fn inspect(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = rt.inspect(recv);
    Ok(rt.new_string(s))
}

fn to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = rt.to_s(recv);
    Ok(rt.new_string(s))
}

fn nil(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::from_bool(recv.is_nil()))
}
