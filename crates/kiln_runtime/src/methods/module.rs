//! Reflection and definition methods available on every class and module.

use super::common::*;
use crate::builtins_registry::BuiltinRegistry;
use crate::core::{ClassId, Value};
use crate::errors::{RtResult, RuntimeError};
use crate::object::names::is_ivar_name;
use crate::object::{CoreClasses, Visibility};
use crate::runtime::Runtime;

pub(crate) fn install(core: &CoreClasses, registry: &mut BuiltinRegistry) {
    let m = core.module;
    registry.register(m, "name", name);
    registry.register(m, "to_s", inspect);
    registry.register(m, "inspect", inspect);
    registry.register(m, "constants", constants);
    registry.register(m, "const_get", const_get);
    registry.register(m, "const_set", const_set);
    registry.register(m, "const_defined?", const_defined);
    registry.register(m, "ancestors", ancestors);
    registry.register(m, "include", include);
    registry.register(m, "include?", includes);
    registry.register(m, "prepend", prepend);
    registry.register(m, "private_constant", private_constant);
    registry.register(m, "public_constant", public_constant);
    registry.register(m, "deprecate_constant", deprecate_constant);
    registry.register(m, "attr_reader", attr_reader);
    registry.register(m, "attr_writer", attr_writer);
    registry.register(m, "attr_accessor", attr_accessor);
    registry.register(m, "instance_methods", instance_methods);
    registry.register(m, "method_defined?", method_defined);
    registry.register(m, "remove_method", remove_method);
    registry.register(m, "undef_method", undef_method);
    registry.register(m, "alias_method", alias_method);
    registry.register(m, "private", private);
    registry.register(m, "public", public);
    registry.register(m, "===", case_eq);
}

fn receiver(rt: &Runtime, recv: Value) -> RtResult<ClassId> {
    expect_class(rt, recv)
}

fn name(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = receiver(rt, recv)?;
    Ok(match rt.graph().name_of(id) {
        Some(name) => rt.new_string(name),
        None => Value::NIL,
    })
}

fn inspect(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = receiver(rt, recv)?;
    let s = rt.graph().display_name(id);
    Ok(rt.new_string(s))
}

fn constants(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 1)?;
    let id = receiver(rt, recv)?;
    let inherit = args.is_empty() || args[0].is_truthy();
    let names = rt.constants(id, inherit);
    let syms = symbols(rt, names);
    Ok(rt.new_array(syms))
}

/// Accepts `Outer::Inner` paths.
fn const_get(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 2)?;
    let mut scope = receiver(rt, recv)?;
    let path = expect_name(rt, args[0])?;
    let mut value = Value::NIL;
    for (i, segment) in path.split("::").enumerate() {
        if i > 0 {
            scope = expect_class(rt, value)?;
        }
        value = rt.const_get(scope, segment)?;
    }
    Ok(value)
}

fn const_set(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 2, 2)?;
    let scope = receiver(rt, recv)?;
    let name = expect_name(rt, args[0])?;
    rt.const_set(scope, &name, args[1])
}

fn const_defined(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 2)?;
    let scope = receiver(rt, recv)?;
    let name = expect_name(rt, args[0])?;
    let inherit = args.len() < 2 || args[1].is_truthy();
    rt.const_defined(scope, &name, inherit).map(Value::from_bool)
}

fn each_constant(
    rt: &mut Runtime,
    recv: Value,
    args: &[Value],
    apply: fn(&Runtime, ClassId, &str) -> RtResult<()>,
) -> RtResult<Value> {
    let scope = receiver(rt, recv)?;
    for name in args {
        let name = expect_name(rt, *name)?;
        apply(rt, scope, &name)?;
    }
    Ok(recv)
}

fn private_constant(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    each_constant(rt, recv, args, Runtime::private_constant)
}

fn public_constant(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    each_constant(rt, recv, args, Runtime::public_constant)
}

fn deprecate_constant(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    each_constant(rt, recv, args, Runtime::deprecate_constant)
}

fn ancestors(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 0)?;
    let id = receiver(rt, recv)?;
    let chain = rt.ancestors(id).into_iter().map(Value::class).collect();
    Ok(rt.new_array(chain))
}

/// `include A, B` leaves `A` first in the chain.
fn include(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, usize::MAX)?;
    let id = receiver(rt, recv)?;
    for module in args.iter().rev() {
        let module = expect_class(rt, *module)?;
        rt.include_module(id, module)?;
    }
    Ok(recv)
}

/// `prepend A, B` leaves `A` in front of `B`, both ahead of the receiver.
fn prepend(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, usize::MAX)?;
    let id = receiver(rt, recv)?;
    for module in args.iter().rev() {
        let module = expect_class(rt, *module)?;
        rt.prepend_module(id, module)?;
    }
    Ok(recv)
}

fn includes(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let id = receiver(rt, recv)?;
    let module = expect_class(rt, args[0])?;
    if !rt.graph().get(module).is_module() {
        return Err(RuntimeError::TypeMismatch(format!(
            "wrong argument type {} (expected Module)",
            rt.graph().display_name(rt.class_of(args[0]))
        )));
    }
    Ok(Value::from_bool(id != module && rt.ancestors(id).contains(&module)))
}

fn instance_methods(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 0, 1)?;
    let id = receiver(rt, recv)?;
    let include_super = args.is_empty() || args[0].is_truthy();
    let names = rt
        .instance_methods(id, include_super)
        .into_iter()
        .map(Value::symbol)
        .collect();
    Ok(rt.new_array(names))
}

fn method_defined(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let id = receiver(rt, recv)?;
    let name = expect_name(rt, args[0])?;
    Ok(Value::from_bool(rt.method_defined(id, &name)))
}

fn remove_method(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    let id = receiver(rt, recv)?;
    for name in args {
        let name = expect_name(rt, *name)?;
        rt.remove_method(id, &name)?;
    }
    Ok(recv)
}

fn undef_method(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    let id = receiver(rt, recv)?;
    for name in args {
        let name = expect_name(rt, *name)?;
        rt.undef_method(id, &name)?;
    }
    Ok(recv)
}

fn alias_method(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 2, 2)?;
    let id = receiver(rt, recv)?;
    let new_name = expect_name(rt, args[0])?;
    let old_name = expect_name(rt, args[1])?;
    rt.alias_method(id, &new_name, &old_name).map(Value::symbol)
}

fn set_visibility(
    rt: &mut Runtime,
    recv: Value,
    args: &[Value],
    visibility: Visibility,
) -> RtResult<Value> {
    let id = receiver(rt, recv)?;
    for name in args {
        let name = expect_name(rt, *name)?;
        rt.set_visibility(id, &name, visibility)?;
    }
    Ok(match args {
        [] => Value::NIL,
        [single] => *single,
        many => rt.new_array(many.to_vec()),
    })
}

fn private(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    set_visibility(rt, recv, args, Visibility::Private)
}

fn public(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    set_visibility(rt, recv, args, Visibility::Public)
}

/// Defines `name` reading `@name` and/or `name=` writing it. Returns the
/// defined method names.
fn define_attributes(
    rt: &mut Runtime,
    recv: Value,
    args: &[Value],
    reader: bool,
    writer: bool,
) -> RtResult<Value> {
    let id = receiver(rt, recv)?;
    let mut defined = Vec::with_capacity(args.len() * 2);
    for name in args {
        let name = expect_name(rt, *name)?;
        let ivar = format!("@{name}");
        if !is_ivar_name(&ivar) {
            return Err(RuntimeError::InvalidIvarName(ivar));
        }
        if reader {
            let ivar = ivar.clone();
            let sym = rt.define_method(id, &name, move |rt, recv, args| {
                validate_arity(args, 0, 0)?;
                Ok(rt.ivar_get(recv, &ivar)?.unwrap_or(Value::NIL))
            })?;
            defined.push(Value::symbol(sym));
        }
        if writer {
            let sym = rt.define_method(id, &format!("{name}="), move |rt, recv, args| {
                validate_arity(args, 1, 1)?;
                rt.ivar_set(recv, &ivar, args[0])
            })?;
            defined.push(Value::symbol(sym));
        }
    }
    Ok(rt.new_array(defined))
}

fn attr_reader(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    define_attributes(rt, recv, args, true, false)
}

fn attr_writer(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    define_attributes(rt, recv, args, false, true)
}

fn attr_accessor(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    define_attributes(rt, recv, args, true, true)
}

fn case_eq(rt: &mut Runtime, recv: Value, args: &[Value]) -> RtResult<Value> {
    validate_arity(args, 1, 1)?;
    let id = receiver(rt, recv)?;
    Ok(Value::from_bool(rt.is_a(args[0], id)))
}
