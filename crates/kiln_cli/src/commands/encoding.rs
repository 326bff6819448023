use kiln_runtime::{ConfigRegistry, Runtime, Value};
use serde_json::json;

use crate::args::{CliArgs, take_assignment};
use crate::commands::{CliError, CliResult, print_json, runtime_with};

pub(crate) fn run(args: &CliArgs) -> CliResult {
    let mut positional = args.positional.clone();
    let internal = take_assignment(&mut positional, "internal");
    let external = take_assignment(&mut positional, "external");
    if let Some(extra) = positional.first() {
        return Err(CliError::Usage(format!("Unexpected argument: {extra}")));
    }

    let mut rt = runtime_with(ConfigRegistry::empty());
    if let Some(name) = external {
        let value = encoding_arg(&mut rt, name);
        rt.set_default_external(value)?;
    }
    if let Some(name) = internal {
        let value = encoding_arg(&mut rt, name);
        rt.set_default_internal(value)?;
    }

    let ext = rt.default_external();
    let int = rt.default_internal();
    let external = rt.to_s(ext);
    let internal = if int.is_nil() { None } else { Some(rt.to_s(int)) };

    if args.json_out {
        print_json(json!({ "default_external": external, "default_internal": internal }));
    } else {
        println!("default_external={external}");
        println!("default_internal={}", internal.as_deref().unwrap_or("nil"));
    }
    Ok(())
}

fn encoding_arg(rt: &mut Runtime, name: String) -> Value {
    if name == "nil" { Value::NIL } else { rt.new_string(name) }
}
