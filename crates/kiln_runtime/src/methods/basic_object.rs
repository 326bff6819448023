use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::{RtResult, RuntimeError};
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let c = core.basic_object;
    registry.register_private(c, "initialize", initialize);
    registry.register(c, "==", identical);
    registry.register(c, "equal?", identical);
    registry.register(c, "!", not);
    registry.register(c, "!=", not_equal);
    registry.register(c, "__id__", id);
    registry.register(c, "__send__", send);
    registry.register_private(c, "method_missing", method_missing);
}

fn initialize(_rt: &mut Runtime, _recv: Value, _args: &[Value]) -> RtResult<Value> {
    Ok(Value::NIL)
}

fn identical(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    Ok(Value::from_bool(recv == args[0]))
}

fn not(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::from_bool(!recv.is_truthy()))
}

fn not_equal(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let eq = rt.send(recv, "==", args)?;
    Ok(Value::from_bool(!eq.is_truthy()))
}

fn id(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.object_id(recv))
}

fn send(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    if args.is_empty() {
        return Err(RuntimeError::Argument("no method name given".into()));
    }
    let name = expect_name(rt, args[0])?;
    rt.send(recv, &name, &args[1..])
}

/// Last stop of every dispatch miss.
fn method_missing(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    if args.is_empty() {
        return Err(RuntimeError::Argument("no method name given".into()));
    }
    let name = expect_name(rt, args[0])?;
    Err(RuntimeError::NoSuchMethod {
        name,
        receiver: rt.describe_receiver(recv),
    })
}
