pub(crate) struct CliArgs {
    pub cmd: String,
    pub verbose: bool,
    pub json_out: bool,
    pub positional: Vec<String>,
}

pub(crate) fn usage() -> &'static str {
    "Usage: kiln <config|config-flags|encoding|constants|ancestors|methods|scenario> [verbose] [json] <args>"
}

pub(crate) fn parse_args() -> Result<CliArgs, String> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    let cmd = argv.first().cloned().ok_or_else(|| usage().to_string())?;
    argv.remove(0);

    let mut verbose = false;
    let mut json_out = false;
    let mut positional: Vec<String> = Vec::new();

    for a in argv {
        if a.starts_with("--") {
            return Err(format!("Unknown option: {a}"));
        }
        if a == "verbose" {
            verbose = true;
        } else if a == "json" {
            json_out = true;
        } else {
            positional.push(a);
        }
    }

    Ok(CliArgs {
        cmd,
        verbose,
        json_out,
        positional,
    })
}

/// Split `key=value` words out of the positional list.
pub(crate) fn take_assignment(positional: &mut Vec<String>, key: &str) -> Option<String> {
    let prefix = format!("{key}=");
    let idx = positional.iter().position(|a| a.starts_with(&prefix))?;
    let word = positional.remove(idx);
    Some(word[prefix.len()..].to_string())
}
