use crate::core::{ClassId, Value, ValueKind};
use crate::errors::{RtResult, RuntimeError};
use crate::runtime::Runtime;

/// Check that the argument count lies within `min..=max`.
pub fn validate_arity(args: &[Value], min: usize, max: usize) -> RtResult<()> {
    if args.len() >= min && args.len() <= max {
        return Ok(());
    }
    let expected = match (min, max) {
        (min, max) if min == max => return Err(RuntimeError::argument_count(args.len(), min)),
        (min, usize::MAX) => format!("{min}+"),
        (min, max) => format!("{min}..{max}"),
    };
    Err(RuntimeError::Argument(format!(
        "wrong number of arguments (given {}, expected {expected})",
        args.len()
    )))
}

pub fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).copied().unwrap_or(Value::NIL)
}

/// A symbol or string argument naming a method, constant or variable.
pub fn expect_name(rt: &Runtime, value: Value) -> RtResult<String> {
    match value.kind() {
        ValueKind::Symbol(sym) => Ok(rt.symbol_name(sym)),
        ValueKind::Str(_) => Ok(rt.str_of(value).unwrap_or_default().to_string()),
        _ => Err(RuntimeError::TypeMismatch(format!(
            "{} is not a symbol nor a string",
            rt.inspect(value)
        ))),
    }
}

pub fn expect_class(rt: &Runtime, value: Value) -> RtResult<ClassId> {
    match value.kind() {
        ValueKind::Class(id) => Ok(id),
        _ => Err(RuntimeError::TypeMismatch(format!(
            "{} is not a class/module",
            rt.inspect(value)
        ))),
    }
}

pub fn expect_str(rt: &Runtime, value: Value) -> RtResult<String> {
    rt.str_of(value).map(str::to_owned).ok_or_else(|| {
        RuntimeError::no_implicit_conversion(&rt.graph().display_name(rt.class_of(value)), "String")
    })
}

pub fn expect_int(rt: &Runtime, value: Value) -> RtResult<i64> {
    match value.kind() {
        ValueKind::Int(n) => Ok(n),
        _ => Err(RuntimeError::no_implicit_conversion(
            &rt.graph().display_name(rt.class_of(value)),
            "Integer",
        )),
    }
}

pub fn symbols(rt: &Runtime, names: impl IntoIterator<Item = String>) -> Vec<Value> {
    names.into_iter().map(|n| rt.symbol(&n)).collect()
}
