use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::{Payload, Value};
use crate::errors::RtResult;
use crate::object::CoreClasses;
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let c = core.class;
    registry.register(c, "new", new);
    registry.register(c, "allocate", allocate);
    registry.register(c, "superclass", superclass);
}

/// `Class.new(parent)`, `Module.new`, `String.new(str)` or a plain instance.
fn new(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    let class = expect_class(rt, recv)?;
    let core = rt.core();
    if rt.graph().get(class).is_singleton() {
        // refused by the allocator
        return rt.allocate(class);
    }
    if rt.graph().is_kind_of(class, core.class) {
        validate_arity(args, 0, 1)?;
        let parent = match args.first() {
            Some(v) => expect_class(rt, *v)?,
            None => core.object,
        };
        return rt.new_class(parent).map(Value::class);
    }
    if rt.graph().is_kind_of(class, core.module) {
        validate_arity(args, 0, 0)?;
        return Ok(Value::class(rt.new_module()));
    }
    if rt.graph().is_kind_of(class, core.string) {
        validate_arity(args, 0, 1)?;
        let value = rt.allocate(class)?;
        if let Some(init) = args.first() {
            let s = expect_str(rt, *init)?;
            rt.heap.get_mut(value.as_obj_id()).payload = Payload::Str(s);
        }
        return Ok(value);
    }
    rt.instantiate(class, args)
}

fn allocate(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let class = expect_class(rt, recv)?;
    rt.allocate(class)
}

fn superclass(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let class = expect_class(rt, recv)?;
    Ok(rt
        .graph()
        .superclass(class)
        .map(Value::class)
        .unwrap_or(Value::NIL))
}
