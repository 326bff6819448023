use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::{RtResult, RuntimeError};
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let a = core.array;
    registry.register(a, "length", length);
    registry.register(a, "size", length);
    registry.register(a, "[]", index);
    registry.register(a, "first", first);
    registry.register(a, "include?", include);
    registry.register(a, "to_a", to_a);
}

fn items(rt: &Runtime, recv: Value) -> RtResult<Vec<Value>> {
    rt.array_of(recv)
        .map(<[Value]>::to_vec)
        .ok_or_else(|| RuntimeError::TypeMismatch(format!("{} is not an Array", rt.inspect(recv))))
}

fn length(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::from_i64(items(rt, recv)?.len() as i64))
}

/// Negative indices count from the end.
fn index(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let items = items(rt, recv)?;
    let idx = expect_int(rt, args[0])?;
    let len = items.len() as i64;
    let idx = if idx < 0 { idx + len } else { idx };
    if idx < 0 || idx >= len {
        return Ok(Value::NIL);
    }
    Ok(items[idx as usize])
}

fn first(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(items(rt, recv)?.first().copied().unwrap_or(Value::NIL))
}

/// Membership through each element's `==`.
fn include(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    for item in items(rt, recv)? {
        if rt.send(item, "==", &[args[0]])?.is_truthy() {
            return Ok(Value::TRUE);
        }
    }
    Ok(Value::FALSE)
}

fn to_a(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(recv)
}
