//! Comparable, in terms of the receiver's `<=>`.

use std::cmp::Ordering;

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::{Value, ValueKind};
use crate::errors::{RtResult, RuntimeError};
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let c = core.comparable;
    registry.register(c, "==", eq);
    registry.register(c, "<", lt);
    registry.register(c, "<=", le);
    registry.register(c, ">", gt);
    registry.register(c, ">=", ge);
    registry.register(c, "between?", between);
    registry.register(c, "clamp", clamp);
}

/// `None` when `<=>` answers anything but an Integer.
fn compare(rt: &mut Runtime, a: Value, b: Value) -> RtResult<Option<Ordering>> {
    let result = rt.send(a, "<=>", &[b])?;
    Ok(match result.kind() {
        ValueKind::Int(n) => Some(n.cmp(&0)),
        _ => None,
    })
}

fn ordered(rt: &mut Runtime, a: Value, b: Value) -> RtResult<Ordering> {
    compare(rt, a, b)?.ok_or_else(|| {
        RuntimeError::Argument(format!(
            "comparison of {} with {} failed",
            rt.graph().display_name(rt.class_of(a)),
            rt.inspect(b)
        ))
    })
}

fn eq(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    if recv == args[0] {
        return Ok(Value::TRUE);
    }
    let same = compare(rt, recv, args[0])? == Some(Ordering::Equal);
    Ok(Value::from_bool(same))
}

fn check(
    rt: &mut Runtime,
    recv: Value,
    args: &[Value],
    accept: fn(Ordering) -> bool,
) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let ord = ordered(rt, recv, args[0])?;
    Ok(Value::from_bool(accept(ord)))
}

fn lt(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    check(rt, recv, args, Ordering::is_lt)
}

fn le(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    check(rt, recv, args, Ordering::is_le)
}

fn gt(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    check(rt, recv, args, Ordering::is_gt)
}

fn ge(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    check(rt, recv, args, Ordering::is_ge)
}

fn between(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 2, 2)?;
    let above = ordered(rt, recv, args[0])?.is_ge();
    let below = ordered(rt, recv, args[1])?.is_le();
    Ok(Value::from_bool(above && below))
}

fn clamp(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 2, 2)?;
    let (min, max) = (args[0], args[1]);
    if ordered(rt, min, max)?.is_gt() {
        return Err(RuntimeError::Argument(
            "min argument must be less than or equal to max argument".into(),
        ));
    }
    if ordered(rt, recv, min)?.is_lt() {
        return Ok(min);
    }
    if ordered(rt, recv, max)?.is_gt() {
        return Ok(max);
    }
    Ok(recv)
}
