use std::process::ExitCode;

use clap::Parser;
use hed::cli::group::GroupCommandOutput;
use hed::cli::{Cli, Commands};
use hed::error::HedError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let serialized = serde_json::to_string_pretty(&error.to_error_response()).unwrap_or_else(
                |_| {
                    "{\"error\":{\"type\":\"serialization_error\",\"message\":\"Failed to serialize error response\"}}"
                        .to_string()
                },
            );
            eprintln!("{serialized}");
            ExitCode::FAILURE
        }
    }
}

/// `-v` info, `-vv` debug, `-vvv` trace. Print-flagged expressions are
/// always shown unless `RUST_LOG` says otherwise.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn,hed::print=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<String, HedError> {
    match cli.command {
        Commands::Group(args) => match hed::cli::group::run_group(args)? {
            GroupCommandOutput::Json(response) => serde_json::to_string_pretty(&response)
                .map_err(|source| HedError::ResponseSerialization { source }),
            GroupCommandOutput::Written(response) => serde_json::to_string_pretty(&response)
                .map_err(|source| HedError::ResponseSerialization { source }),
        },
        Commands::Parse(args) => {
            let response = hed::cli::parse::run_parse(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HedError::ResponseSerialization { source })
        }
        Commands::Functions(args) => {
            let response = hed::cli::functions::run_functions(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HedError::ResponseSerialization { source })
        }
    }
}
