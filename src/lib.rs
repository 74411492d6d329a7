//! Core library entry for the `firemono` CLI.
//!
//! `firemono` takes a directory prepared by `firebase init` and integrates it
//! into an Nx-style monorepo: it detects the configured Firebase features,
//! merges the functions dependency manifest into the workspace manifest,
//! copies the project files, and registers a project descriptor with a
//! feature-conditioned target map in the project graph. A separate
//! [`trigger`] module implements the idempotent document-update handler used
//! by the generated functions project.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod generator;
pub mod ports;
pub mod trigger;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["firemono", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_init_dir() {
        let result =
            run(["firemono", "integrate", "my-app", "--init-dir", "/nonexistent/init-dir"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Init directory does not exist"));
    }
}
