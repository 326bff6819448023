use kiln_runtime::ConfigError;
use kiln_runtime::config::{DERIVED_FLAGS, DerivedFlag};
use serde_json::{Map, Value as Json, json};

use crate::args::CliArgs;
use crate::commands::{CliResult, load_config, print_json, print_lines};

pub(crate) fn run(args: &CliArgs) -> CliResult {
    let (keys, registry) = load_config(args)?;
    let mut pairs: Vec<(String, String)> = if keys.is_empty() {
        registry
            .entries()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        keys.iter()
            .map(|k| Ok((k.clone(), registry.fetch(k)?.to_string())))
            .collect::<Result<_, ConfigError>>()?
    };

    if args.json_out {
        let obj: Map<String, Json> = pairs.into_iter().map(|(k, v)| (k, Json::String(v))).collect();
        print_json(Json::Object(obj));
        return Ok(());
    }
    if keys.len() == 1 {
        print_lines(pairs.into_iter().map(|(_, v)| v));
        return Ok(());
    }
    pairs.sort();
    print_lines(pairs.into_iter().map(|(k, v)| format!("{k}={v}")));
    Ok(())
}

pub(crate) fn run_flags(args: &CliArgs) -> CliResult {
    let (_, registry) = load_config(args)?;
    let flags: Vec<(&str, Option<DerivedFlag>)> = DERIVED_FLAGS
        .iter()
        .map(|name| (*name, registry.derived_flag(name)))
        .collect();

    if args.json_out {
        let obj: Map<String, Json> = flags
            .into_iter()
            .map(|(name, flag)| {
                let v = match flag {
                    Some(DerivedFlag::Bool(b)) => json!(b),
                    Some(DerivedFlag::Str(s)) => json!(s),
                    None => Json::Null,
                };
                (name.to_string(), v)
            })
            .collect();
        print_json(Json::Object(obj));
        return Ok(());
    }
    print_lines(flags.into_iter().map(|(name, flag)| match flag {
        Some(DerivedFlag::Bool(b)) => format!("{name}={b}"),
        Some(DerivedFlag::Str(s)) => format!("{name}={s}"),
        None => format!("{name}=nil"),
    }));
    Ok(())
}
