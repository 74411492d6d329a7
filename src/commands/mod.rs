//! Command dispatch and handlers.

pub mod detect;
pub mod integrate;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Integrate { name, init_directory, directory, tags, workspace_root } => {
            integrate::run(&crate::generator::GeneratorOptions {
                name: name.clone(),
                directory: directory.clone(),
                tags: tags.clone(),
                init_directory: init_directory.clone(),
                workspace_root: workspace_root.clone(),
            })
        }
        Command::Detect { init_directory } => detect::run(init_directory),
    }
}
