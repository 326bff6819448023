//! Encoding objects and the default-encoding accessors on `Encoding` itself.

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::{EncodingId, Value, ValueKind};
use crate::errors::{RtResult, RuntimeError};
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let e = core.encoding;
    registry.register(e, "name", name);
    registry.register(e, "to_s", name);
    registry.register(e, "inspect", inspect);
    registry.register(e, "names", names);
    registry.register(e, "ascii_compatible?", ascii_compatible);
    registry.register(e, "dummy?", dummy);
    registry.register(e, "valid_codepoint?", valid_codepoint);

    registry.register_singleton(e, "default_internal", default_internal);
    registry.register_singleton(e, "default_internal=", set_default_internal);
    registry.register_singleton(e, "default_external", default_external);
    registry.register_singleton(e, "default_external=", set_default_external);
    registry.register_singleton(e, "find", find);
    registry.register_singleton(e, "list", list);
    registry.register_singleton(e, "name_list", name_list);
}

fn this(rt: &Runtime, recv: Value) -> RtResult<EncodingId> {
    rt.encoding_id(recv).ok_or_else(|| {
        RuntimeError::TypeMismatch(format!("{} is not an Encoding", rt.inspect(recv)))
    })
}

fn name(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = this(rt, recv)?;
    let name = rt.encodings().info(id).name;
    Ok(rt.new_string(name))
}

fn inspect(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    this(rt, recv)?;
    let s = rt.inspect(recv);
    Ok(rt.new_string(s))
}

fn names(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = this(rt, recv)?;
    let all: Vec<&'static str> = rt.encodings().info(id).names().collect();
    let strings = all.into_iter().map(|n| rt.new_string(n)).collect();
    Ok(rt.new_array(strings))
}

fn ascii_compatible(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = this(rt, recv)?;
    Ok(Value::from_bool(rt.encodings().info(id).ascii_compatible))
}

fn dummy(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = this(rt, recv)?;
    Ok(Value::from_bool(rt.encodings().info(id).dummy))
}

fn valid_codepoint(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let id = this(rt, recv)?;
    let codepoint = expect_int(rt, args[0])?;
    Ok(Value::from_bool(rt.encodings().info(id).valid_codepoint(codepoint)))
}

fn default_internal(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.default_internal())
}

fn set_default_internal(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    rt.set_default_internal(args[0])
}

fn default_external(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    Ok(rt.default_external())
}

fn set_default_external(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    rt.set_default_external(args[0])
}

fn find(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    if let ValueKind::Encoding(_) = args[0].kind() {
        return Ok(args[0]);
    }
    let name = expect_str(rt, args[0])?;
    rt.encodings()
        .find(&name)
        .map(Value::encoding)
        .ok_or(RuntimeError::UnknownEncoding(name))
}

fn list(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let all = rt.encodings().list().map(Value::encoding).collect();
    Ok(rt.new_array(all))
}

fn name_list(rt: &mut Runtime, _recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let names = rt.encodings().name_list();
    let strings = names.into_iter().map(|n| rt.new_string(n)).collect();
    Ok(rt.new_array(strings))
}
