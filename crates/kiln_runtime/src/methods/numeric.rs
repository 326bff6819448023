use std::cmp::Ordering;

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::{Value, ValueKind};
use kiln_core::value::{INT_MAX, INT_MIN};
use crate::errors::{RtResult, RuntimeError};
use crate::object::CoreClasses;
use crate::runtime::{Runtime, format_float};

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let i = core.integer;
    registry.register(i, "to_s", int_to_s);
    registry.register(i, "inspect", int_to_s);
    registry.register(i, "==", num_eq);
    registry.register(i, "<=>", num_cmp);
    registry.register(i, "+", int_add);
    registry.register(i, "-", int_sub);
    registry.register(i, "*", int_mul);

    let f = core.float;
    registry.register(f, "to_s", float_to_s);
    registry.register(f, "inspect", float_to_s);
    registry.register(f, "==", num_eq);
    registry.register(f, "<=>", num_cmp);
}

fn as_number(value: Value) -> Option<f64> {
    match value.kind() {
        ValueKind::Int(n) => Some(n as f64),
        ValueKind::Float(f) => Some(f),
        _ => None,
    }
}

fn int_to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let n = expect_int(rt, recv)?;
    Ok(rt.new_string(n.to_string()))
}

fn float_to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = format_float(recv.as_f64());
    Ok(rt.new_string(s))
}

fn num_eq(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let equal = match (recv.kind(), args[0].kind()) {
        (ValueKind::Int(a), ValueKind::Int(b)) => a == b,
        _ => match (as_number(recv), as_number(args[0])) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    };
    Ok(Value::from_bool(equal))
}

fn num_cmp(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let ordering = match (recv.kind(), args[0].kind()) {
        (ValueKind::Int(a), ValueKind::Int(b)) => Some(a.cmp(&b)),
        _ => match (as_number(recv), as_number(args[0])) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    Ok(match ordering {
        Some(Ordering::Less) => Value::from_i64(-1),
        Some(Ordering::Equal) => Value::from_i64(0),
        Some(Ordering::Greater) => Value::from_i64(1),
        None => Value::NIL,
    })
}

fn int_op(
    rt: &mut Runtime,
    recv: Value,
    args: &[Value],
    op: &str,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let a = expect_int(rt, recv)?;
    match args[0].kind() {
        ValueKind::Int(b) => match int(a, b).filter(|n| (INT_MIN..=INT_MAX).contains(n)) {
            Some(n) => Ok(Value::from_i64(n)),
            None => Err(RuntimeError::Argument(format!("integer overflow in {op}"))),
        },
        ValueKind::Float(b) => Ok(Value::from_f64(float(a as f64, b))),
        _ => Err(RuntimeError::TypeMismatch(format!(
            "{} can't be coerced into Integer",
            rt.graph().display_name(rt.class_of(args[0]))
        ))),
    }
}

fn int_add(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    int_op(rt, recv, args, "+", i64::checked_add, |a, b| a + b)
}

fn int_sub(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    int_op(rt, recv, args, "-", i64::checked_sub, |a, b| a - b)
}

fn int_mul(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    int_op(rt, recv, args, "*", i64::checked_mul, |a, b| a * b)
}
