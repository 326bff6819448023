use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::Value;
use crate::errors::RtResult;
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    registry.register(core.symbol, "to_s", to_s);
    registry.register(core.symbol, "name", to_s);
    registry.register(core.symbol, "to_sym", to_sym);
    registry.register(core.symbol, "length", length);
}

fn to_s(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let s = rt.to_s(recv);
    Ok(rt.new_string(s))
}

fn to_sym(_rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(recv)
}

fn length(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(Value::from_i64(rt.to_s(recv).chars().count() as i64))
}
