use anyhow::Result;
use clap::{CommandFactory, Parser};
use filerenamer_core::{
    CaseSetting, Config, OutputFormatter, PlanError, Preview, RuleError, VersionResult,
};
use std::io;
use std::process;
use std::str::FromStr;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod plan;
mod rename;
mod request;

use cli::{Cli, Commands, OutputFormat};
use request::{build_request, NamingOverrides};

const LOG_ENV: &str = "FILERENAMER_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("Error: Failed to change to directory {}: {e}", dir.display());
            process::exit(2);
        }
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });

    let use_color = if cli.no_color {
        Some(false)
    } else {
        config.defaults.use_color
    };

    let overrides = NamingOverrides {
        case: if cli.case_sensitive {
            Some(CaseSetting::Sensitive)
        } else if cli.case_insensitive {
            Some(CaseSetting::Insensitive)
        } else {
            None
        },
        charset: cli.charset.map(Into::into),
    };

    let result = match cli.command {
        Commands::Plan {
            batch,
            preview,
            output,
        } => build_request(batch, overrides, &config).and_then(|request| {
            plan::handle_plan(
                &request,
                preview_format(preview, &config),
                output,
                use_color,
            )
        }),

        Commands::Rename {
            batch,
            preview,
            output,
            log,
        } => {
            if output == OutputFormat::Json && !cli.yes {
                Cli::command()
                    .error(
                        clap::error::ErrorKind::MissingRequiredArgument,
                        "`rename --output json` cannot prompt; pass --yes to confirm",
                    )
                    .exit();
            }

            build_request(batch, overrides, &config).and_then(|request| {
                rename::handle_rename(
                    &request,
                    preview_format(preview, &config),
                    output,
                    log,
                    cli.yes,
                    use_color,
                )
            })
        },

        Commands::Version { output } => handle_version(output).map(|()| true),
    };

    match result {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

/// Log to stderr, filtered by `FILERENAMER_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn preview_format(arg: Option<cli::PreviewArg>, config: &Config) -> Preview {
    arg.map_or_else(
        || Preview::from_str(&config.defaults.preview_format).unwrap_or(Preview::Table),
        Into::into,
    )
}

/// 2 for bad input, 3 for everything else
fn exit_code(e: &anyhow::Error) -> i32 {
    let invalid_input = e.chain().any(|cause| {
        cause.is::<PlanError>()
            || cause.is::<RuleError>()
            || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    });

    if invalid_input {
        2
    } else {
        3
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "filerenamer".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    print!("{}", version_result.format(output.into()));
    if output == OutputFormat::Json {
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_for_plan_errors() {
        let err = anyhow::Error::from(PlanError::CountMismatch {
            originals: 2,
            proposed: 1,
        });
        assert_eq!(exit_code(&err), 2);

        let err = Err::<(), _>(PlanError::NoFiles)
            .context("planning batch")
            .unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_for_missing_names_file() {
        let err = Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "gone"))
            .context("Failed to read names from list.txt")
            .unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_for_internal_errors() {
        let err = anyhow::anyhow!("something broke");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_preview_format_falls_back_to_config() {
        let mut config = Config::default();
        config.defaults.preview_format = "summary".to_string();
        assert_eq!(preview_format(None, &config), Preview::Summary);
        assert_eq!(
            preview_format(Some(cli::PreviewArg::None), &config),
            Preview::None
        );

        config.defaults.preview_format = "bogus".to_string();
        assert_eq!(preview_format(None, &config), Preview::Table);
    }
}
