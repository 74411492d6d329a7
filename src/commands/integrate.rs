//! `firemono integrate` command.

use crate::context::ServiceContext;
use crate::generator::{integrate, GeneratorOptions, GeneratorSummary};

/// Execute the `integrate` command against the live workspace.
///
/// # Errors
///
/// Returns an error string if validation fails or the generator cannot
/// complete its writes.
pub fn run(opts: &GeneratorOptions) -> Result<(), String> {
    let ctx = ServiceContext::live(&opts.workspace_root);
    let summary = integrate(&ctx, opts)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &GeneratorSummary) {
    println!("Firebase project {} integrated successfully.", summary.project_name);
    if let Some(functions) = &summary.functions_project {
        println!("Created functions sub-project: {}", functions.name);
        if functions.dependencies_added {
            println!("Added Firebase dependencies to the workspace package.json.");
            println!("Run 'npm install' to install them.");
        }
    }
    let features = summary.features.names();
    println!(
        "Detected Firebase features: {}",
        if features.is_empty() { "none".to_string() } else { features.join(", ") }
    );
    println!("Project created at: {} ({} files copied)", summary.project_root, summary.files_copied);
    println!("Applied tags: {}", summary.tags.join(", "));
    println!("Quick start:");
    println!("  nx build {}", summary.project_name);
    println!("  nx deploy {}", summary.project_name);
    if summary.functions_project.is_some() {
        println!("  nx logs {}", summary.project_name);
    }
}
