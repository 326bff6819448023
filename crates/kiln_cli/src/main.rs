mod args;
mod commands;

use tracing::Level;

use crate::commands::CliError;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    let args = match args::parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    let result = match args.cmd.as_str() {
        "config" => commands::config::run(&args),
        "config-flags" => commands::config::run_flags(&args),
        "encoding" => commands::encoding::run(&args),
        "constants" => commands::inspect::constants(&args),
        "ancestors" => commands::inspect::ancestors(&args),
        "methods" => commands::inspect::methods(&args),
        "scenario" => commands::scenario::run(&args),
        other => Err(CliError::Usage(format!(
            "Unknown command: {other}\n{}",
            args::usage()
        ))),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}
