//! Command line definition

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::logging::LogFormat;

/// Build the `confmig` command
#[must_use]
pub fn command() -> Command {
    Command::new("confmig")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate agent plugin configuration files to current settings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .help("Log filter used when RUST_LOG is not set"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log output format on stderr (text or json)"),
        )
        .arg(
            Arg::new("engine-config")
                .long("engine-config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with migration engine settings"),
        )
        .subcommand(
            Command::new("migrate")
                .about("Migrate configuration files")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("stdout")
                        .help("Overwrite the input files instead of writing <FILE>.migrated"),
                )
                .arg(
                    Arg::new("stdout")
                        .long("stdout")
                        .action(ArgAction::SetTrue)
                        .help("Print migrated documents instead of writing files"),
                )
                .arg(
                    Arg::new("files")
                        .value_name("FILES")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Configuration files to migrate"),
                ),
        )
        .subcommand(Command::new("list").about("List plugins with a registered migration"))
}
