use std::cmp::Ordering;

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::RtResult;
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let s = core.string;
    registry.register(s, "to_s", to_s);
    registry.register(s, "to_str", to_s);
    registry.register(s, "==", eq);
    registry.register(s, "<=>", cmp);
    registry.register(s, "+", concat);
    registry.register(s, "length", length);
    registry.register(s, "size", length);
    registry.register(s, "to_sym", to_sym);
}

fn this(rt: &Runtime, recv: Value) -> RtResult<String> {
    expect_str(rt, recv)
}

/// Plain strings answer themselves; subclasses get a plain copy.
fn to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    if rt.class_of(recv) == rt.core().string {
        return Ok(recv);
    }
    let s = this(rt, recv)?;
    Ok(rt.new_string(s))
}

fn eq(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let other = rt.str_of(args[0]);
    Ok(Value::from_bool(other.is_some() && other == rt.str_of(recv)))
}

fn cmp(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let (Some(a), Some(b)) = (rt.str_of(recv), rt.str_of(args[0])) else {
        return Ok(Value::NIL);
    };
    Ok(Value::from_i64(match a.cmp(b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }))
}

fn concat(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let mut s = this(rt, recv)?;
    s.push_str(&expect_str(rt, args[0])?);
    Ok(rt.new_string(s))
}

fn length(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let n = this(rt, recv)?.chars().count();
    Ok(Value::from_i64(n as i64))
}

fn to_sym(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = this(rt, recv)?;
    Ok(rt.symbol(&s))
}
