//! Canned object-model walkthroughs. Each one prints its outcome as a single
//! line, so an expected failure shows up as the error's class name.

use kiln_runtime::config::BuildSource;
use kiln_runtime::{ConfigRegistry, RtResult, Runtime, RuntimeConfig, Value, ValueKind};
use serde_json::json;
use tracing::debug;

use crate::args::CliArgs;
use crate::commands::{
    CliError, CliResult, print_json, print_lines, runtime_with, single_positional,
};

type ScenarioFn = fn(&mut Runtime) -> RtResult<String>;

const SCENARIOS: &[(&str, &str, ScenarioFn)] = &[
    (
        "basic_object_metaclass",
        "superclass of BasicObject's metaclass",
        basic_object_metaclass,
    ),
    (
        "metaclass_of_metaclass",
        "display name of a metaclass's metaclass",
        metaclass_of_metaclass,
    ),
    (
        "singleton_isolation",
        "a singleton method is invisible to siblings",
        singleton_isolation,
    ),
    (
        "remove_method_missing",
        "calling an unknown method after removing method_missing",
        remove_method_missing,
    ),
    (
        "undef_method",
        "undefining an inherited method in a subclass",
        undef_method,
    ),
    (
        "basic_object_constants",
        "BasicObject's own constants",
        basic_object_constants,
    ),
    (
        "encoding_to_str",
        "default_internal assigned from an object answering to_str",
        encoding_to_str,
    ),
    (
        "config_strings",
        "every configuration value is a String",
        config_strings,
    ),
];

pub(crate) fn run(args: &CliArgs) -> CliResult {
    let name = single_positional(&args.positional, "scenario")?;
    if name == "list" {
        if args.json_out {
            let list: Vec<_> = SCENARIOS
                .iter()
                .map(|(name, about, _)| json!({ "name": name, "about": about }))
                .collect();
            print_json(json!(list));
        } else {
            print_lines(SCENARIOS.iter().map(|(name, about, _)| format!("{name}\t{about}")));
        }
        return Ok(());
    }
    let Some((_, _, scenario)) = SCENARIOS.iter().find(|(n, _, _)| *n == name) else {
        return Err(CliError::Usage(format!("Unknown scenario: {name}")));
    };

    let config = ConfigRegistry::populate(
        &BuildSource::default(),
        RuntimeConfig::default().config_value_policy,
    )?;
    let mut rt = runtime_with(config);
    let outcome = scenario(&mut rt)?;
    debug!(scenario = name, %outcome, "scenario finished");
    if args.json_out {
        print_json(json!({ "scenario": name, "outcome": outcome }));
    } else {
        println!("{outcome}");
    }
    Ok(())
}

/// Error class name on failure, inspected value on success.
fn outcome(rt: &mut Runtime, result: RtResult<Value>) -> String {
    match result {
        Ok(v) => rt.inspect(v),
        Err(e) => e.class_name().to_string(),
    }
}

fn basic_object_metaclass(rt: &mut Runtime) -> RtResult<String> {
    let basic_object = rt.core().basic_object;
    let meta = rt.singleton_class_of(Value::class(basic_object))?;
    let sup = rt.send(Value::class(meta), "superclass", &[])?;
    Ok(rt.inspect(sup))
}

fn metaclass_of_metaclass(rt: &mut Runtime) -> RtResult<String> {
    let object = rt.core().object;
    let widget = rt.define_class(object, "Widget", None)?;
    let meta = rt.singleton_class_of(Value::class(widget))?;
    let meta_meta = rt.singleton_class_of(Value::class(meta))?;
    Ok(rt.graph().display_name(meta_meta))
}

fn singleton_isolation(rt: &mut Runtime) -> RtResult<String> {
    let object = rt.core().object;
    let a = rt.instantiate(object, &[])?;
    let b = rt.instantiate(object, &[])?;
    rt.define_singleton_method(a, "greet", |rt, _, _| Ok(rt.new_string("hello")))?;
    let greet = rt.symbol("greet");
    let sibling = rt.send(b, "respond_to?", &[greet])?;
    Ok(rt.inspect(sibling))
}

fn remove_method_missing(rt: &mut Runtime) -> RtResult<String> {
    let object = rt.core().object;
    let ghost = rt.define_class(object, "Ghost", None)?;
    rt.define_method(ghost, "method_missing", |_, _, args| {
        Ok(args.first().copied().unwrap_or(Value::NIL))
    })?;
    let obj = rt.instantiate(ghost, &[])?;
    let caught = rt.invoke(obj, "boo", &[]);
    debug!(result = %outcome(rt, caught), "before removal");
    rt.remove_method(ghost, "method_missing")?;
    let result = rt.invoke(obj, "boo", &[]);
    Ok(outcome(rt, result))
}

fn undef_method(rt: &mut Runtime) -> RtResult<String> {
    let object = rt.core().object;
    let parent = rt.define_class(object, "Parent", None)?;
    rt.define_method(parent, "greet", |rt, _, _| Ok(rt.new_string("hi")))?;
    let child = rt.define_class(object, "Child", Some(parent))?;
    rt.undef_method(child, "greet")?;
    let obj = rt.instantiate(child, &[])?;
    let result = rt.invoke(obj, "greet", &[]);
    Ok(outcome(rt, result))
}

fn basic_object_constants(rt: &mut Runtime) -> RtResult<String> {
    let names = rt.own_constants(rt.core().basic_object);
    Ok(names.join(","))
}

fn encoding_to_str(rt: &mut Runtime) -> RtResult<String> {
    let object = rt.core().object;
    let named = rt.define_class(object, "Named", None)?;
    rt.define_method(named, "to_str", |rt, _, _| Ok(rt.new_string("Shift_JIS")))?;
    let obj = rt.instantiate(named, &[])?;
    let set = rt.set_default_internal(obj)?;
    Ok(rt.to_s(set))
}

fn config_strings(rt: &mut Runtime) -> RtResult<String> {
    let keys: Vec<String> = rt.config().keys().map(str::to_owned).collect();
    let mut all_strings = !keys.is_empty();
    for key in keys {
        if let Some(value) = rt.config_value(&key) {
            all_strings &= matches!(value.kind(), ValueKind::Str(_));
        }
    }
    Ok(all_strings.to_string())
}
