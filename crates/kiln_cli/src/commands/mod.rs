use std::fmt;
use std::path::Path;
use std::sync::Arc;

use kiln_runtime::config::{BuildSource, ConfigSource, TextSource};
use kiln_runtime::{
    ClassId, ConfigError, ConfigRegistry, EncodingRegistry, Runtime, RuntimeConfig,
    RuntimeError, ValueKind,
};

use crate::args::{CliArgs, take_assignment};

pub(crate) mod config;
pub(crate) mod encoding;
pub(crate) mod inspect;
pub(crate) mod scenario;

pub(crate) enum CliError {
    Usage(String),
    Runtime(String),
}

impl CliError {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Runtime(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) | CliError::Runtime(msg) => f.write_str(msg),
        }
    }
}

impl From<RuntimeError> for CliError {
    fn from(e: RuntimeError) -> Self {
        CliError::Runtime(format!("{}: {e}", e.class_name()))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Runtime(format!("ConfigError: {e}"))
    }
}

pub(crate) type CliResult = Result<(), CliError>;

/// Positional arguments with `source=PATH` removed, plus the registry it names.
pub(crate) fn load_config(args: &CliArgs) -> Result<(Vec<String>, ConfigRegistry), CliError> {
    let mut positional = args.positional.clone();
    let registry = match take_assignment(&mut positional, "source") {
        Some(path) => populate(&TextSource::from_path(Path::new(&path))?)?,
        None => populate(&BuildSource::default())?,
    };
    Ok((positional, registry))
}

fn populate(source: &dyn ConfigSource) -> Result<ConfigRegistry, ConfigError> {
    let options = RuntimeConfig::default();
    ConfigRegistry::populate(source, options.config_value_policy)
}

pub(crate) fn runtime_with(config: ConfigRegistry) -> Runtime {
    Runtime::with_parts(
        RuntimeConfig::default(),
        Arc::new(EncodingRegistry::default()),
        Arc::new(config),
    )
}

/// Resolve `Name` or `Outer::Inner` starting at Object.
pub(crate) fn resolve_class(rt: &Runtime, path: &str) -> Result<ClassId, CliError> {
    let mut scope = rt.core().object;
    for segment in path.split("::") {
        let value = rt.const_get(scope, segment)?;
        scope = match value.kind() {
            ValueKind::Class(id) => id,
            _ => {
                return Err(CliError::Runtime(format!(
                    "TypeError: {} is not a class/module",
                    rt.inspect(value)
                )));
            }
        };
    }
    Ok(scope)
}

pub(crate) fn single_positional<'a>(
    positional: &'a [String],
    what: &str,
) -> Result<&'a str, CliError> {
    match positional {
        [one] => Ok(one.as_str()),
        _ => Err(CliError::Usage(format!("Missing <{what}>"))),
    }
}

pub(crate) fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn print_json(obj: serde_json::Value) {
    println!("{}", obj);
}
