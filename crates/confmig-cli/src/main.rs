use std::process::ExitCode;

use confmig_cli::logging::{self, LogFormat};

fn main() -> anyhow::Result<ExitCode> {
    let matches = confmig_cli::command().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map_or("info", String::as_str);
    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    logging::init(level, format)?;

    let failed = confmig_cli::run(&matches, &mut std::io::stdout().lock())?;
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
