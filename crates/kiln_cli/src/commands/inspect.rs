use kiln_runtime::ConfigRegistry;
use serde_json::json;

use crate::args::CliArgs;
use crate::commands::{
    CliResult, print_json, print_lines, resolve_class, runtime_with, single_positional,
};

/// `constants CLASS [all]`: own constants, or inherited ones too with `all`.
pub(crate) fn constants(args: &CliArgs) -> CliResult {
    let mut positional = args.positional.clone();
    let inherit = match positional.iter().position(|a| a == "all") {
        Some(idx) => {
            positional.remove(idx);
            true
        }
        None => false,
    };
    let path = single_positional(&positional, "class")?;
    let rt = runtime_with(ConfigRegistry::empty());
    let class = resolve_class(&rt, path)?;
    emit(args, rt.constants(class, inherit))
}

pub(crate) fn ancestors(args: &CliArgs) -> CliResult {
    let path = single_positional(&args.positional, "class")?;
    let rt = runtime_with(ConfigRegistry::empty());
    let class = resolve_class(&rt, path)?;
    let names = rt
        .ancestors(class)
        .into_iter()
        .map(|id| rt.graph().display_name(id))
        .collect();
    emit(args, names)
}

pub(crate) fn methods(args: &CliArgs) -> CliResult {
    let path = single_positional(&args.positional, "class")?;
    let rt = runtime_with(ConfigRegistry::empty());
    let class = resolve_class(&rt, path)?;
    let mut names: Vec<String> = rt
        .instance_methods(class, true)
        .into_iter()
        .map(|sym| rt.symbol_name(sym))
        .collect();
    names.sort();
    emit(args, names)
}

fn emit(args: &CliArgs, names: Vec<String>) -> CliResult {
    if args.json_out {
        print_json(json!(names));
    } else {
        print_lines(names);
    }
    Ok(())
}
