//! `firemono detect` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::generator::features::detect_features;

/// Execute the `detect` command: print the features configured in an init
/// directory.
///
/// # Errors
///
/// Currently infallible; detection degrades to the empty set on any read or
/// parse problem.
pub fn run(init_directory: &Path) -> Result<(), String> {
    let ctx = ServiceContext::live(Path::new("."));
    println!("{}", report(&ctx, init_directory));
    Ok(())
}

fn report(ctx: &ServiceContext, init_directory: &Path) -> String {
    let features = detect_features(ctx.fs.as_ref(), init_directory);
    if features.is_empty() {
        "No Firebase features detected".to_string()
    } else {
        format!("Detected Firebase features: {}", features.names().join(", "))
    }
}
