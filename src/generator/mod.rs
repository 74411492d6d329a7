//! Workspace-integration generator.
//!
//! Turns a directory prepared by `firebase init` into a new entry in the
//! monorepo project graph: feature detection, dependency merging, filtered
//! file import, and a feature-conditioned target map. The run is
//! synchronous; all validation happens before the first write, and every
//! sub-step is independently idempotent so a re-run converges.

pub mod descriptor;
pub mod features;
pub mod functions;
pub mod import;
pub mod manifest;
pub mod targets;

use std::path::PathBuf;

use crate::context::ServiceContext;
use crate::generator::descriptor::{assemble_tags, parse_caller_tags, ProjectDescriptor};
use crate::generator::features::{detect_features, Feature, FeatureSet};
use crate::generator::functions::{
    create_functions_project, retarget_firebase_config, FunctionsProject,
};
use crate::generator::import::copy_tree;
use crate::generator::targets::{synthesize, FunctionsSetup, SynthesisInputs};

/// Caller-supplied generator parameters.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Display name for the new project.
    pub name: String,
    /// Workspace-relative project directory; defaults to `apps/<name>`.
    pub directory: Option<String>,
    /// Comma-separated classification tags.
    pub tags: Option<String>,
    /// Directory prepared by `firebase init`.
    pub init_directory: PathBuf,
    /// Monorepo workspace root.
    pub workspace_root: PathBuf,
}

/// What one generator run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSummary {
    /// Name of the registered Firebase project.
    pub project_name: String,
    /// Workspace-relative project root.
    pub project_root: String,
    /// Detected features.
    pub features: FeatureSet,
    /// The dependent functions sub-project, when one was created.
    pub functions_project: Option<FunctionsProject>,
    /// Applied classification tags, in descriptor order.
    pub tags: Vec<String>,
    /// Files written by the tree import.
    pub files_copied: usize,
}

/// Runs the generator end to end.
///
/// # Errors
///
/// Returns a fatal error before any write when the init directory is
/// missing, has no `firebase.json`, or its `firebase.json` is unparseable or
/// structurally empty. Later I/O failures propagate as errors; parse
/// failures during detection and dependency discovery only degrade the run.
pub fn integrate(ctx: &ServiceContext, opts: &GeneratorOptions) -> Result<GeneratorSummary, String> {
    validate_init_directory(ctx, opts)?;

    let file_name = kebab_case(&opts.name);
    let project_dir =
        opts.directory.clone().unwrap_or_else(|| format!("apps/{file_name}"));
    let base_name = opts
        .directory
        .as_deref()
        .and_then(|dir| dir.split('/').next_back())
        .filter(|segment| !segment.is_empty())
        .map_or(file_name, String::from);
    let project_name = format!("{base_name}-firebase");
    let project_root = format!("{project_dir}/firebase");

    let features = detect_features(ctx.fs.as_ref(), &opts.init_directory);

    let functions_project = if features.has(Feature::Functions) {
        create_functions_project(
            ctx,
            &base_name,
            &project_dir,
            &opts.init_directory,
            &opts.workspace_root,
        )?
    } else {
        None
    };

    let functions_dir = opts.init_directory.join("functions");
    let inputs = SynthesisInputs {
        features: &features,
        base_name: &base_name,
        project_root: &project_root,
        functions_app: functions_project.as_ref().map(|p| p.name.as_str()),
        functions_setup: FunctionsSetup {
            has_manifest: ctx.fs.exists(&functions_dir.join("package.json")),
            has_compiler_config: ctx.fs.exists(&functions_dir.join("tsconfig.json")),
        },
    };
    let targets = synthesize(&inputs);

    let caller_tags = parse_caller_tags(opts.tags.as_deref());
    let tags = assemble_tags(&caller_tags, &base_name, &features);

    // The functions tree is owned by the sub-project when one was created.
    let exclude: &[&str] = if functions_project.is_some() { &["functions"] } else { &[] };
    let report = copy_tree(
        ctx.fs.as_ref(),
        &opts.init_directory,
        &opts.workspace_root.join(&project_root),
        exclude,
    )?;

    if functions_project.is_some() {
        retarget_firebase_config(ctx, &opts.workspace_root, &project_root, &base_name)?;
    }

    let project = ProjectDescriptor {
        name: project_name.clone(),
        root: project_root.clone(),
        project_type: "application".to_string(),
        source_root: None,
        tags: tags.clone(),
        targets,
    };
    ctx.graph
        .add_project(&project)
        .map_err(|e| format!("Failed to register project {project_name}: {e}"))?;

    Ok(GeneratorSummary {
        project_name,
        project_root,
        features,
        functions_project,
        tags,
        files_copied: report.files_copied,
    })
}

/// Pre-condition checks; all fatal, all before any side effect.
fn validate_init_directory(ctx: &ServiceContext, opts: &GeneratorOptions) -> Result<(), String> {
    let init_dir = &opts.init_directory;
    if !ctx.fs.exists(init_dir) {
        return Err(format!(
            "Init directory does not exist: {}. Run 'firebase init' first in your desired directory.",
            init_dir.display()
        ));
    }

    let config_path = init_dir.join("firebase.json");
    if !ctx.fs.exists(&config_path) {
        return Err(format!(
            "No firebase.json found in {}. Run 'firebase init' in that directory first to set up your Firebase project.",
            init_dir.display()
        ));
    }

    if !ctx.fs.exists(&init_dir.join(".firebaserc")) {
        log::warn!("No .firebaserc found. Make sure you've selected a Firebase project.");
    }

    let contents = ctx
        .fs
        .read_to_string(&config_path)
        .map_err(|e| format!("Failed to read {}: {e}", config_path.display()))?;
    match serde_json::from_str::<serde_json::Value>(&contents) {
        Ok(serde_json::Value::Object(object)) if !object.is_empty() => Ok(()),
        Ok(_) => Err(
            "firebase.json appears to be empty or invalid. Re-run 'firebase init' to configure your project properly."
                .to_string(),
        ),
        Err(err) => Err(format!(
            "Invalid firebase.json format: {err}. Re-run 'firebase init' to fix the configuration."
        )),
    }
}

/// Lower-kebab-cases a display name (`MyApp Two` becomes `my-app-two`).
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_lower_or_digit = false;
    for ch in name.chars() {
        if ch == ' ' || ch == '_' {
            out.push('-');
            prev_lower_or_digit = false;
        } else if ch.is_ascii_uppercase() {
            if prev_lower_or_digit {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
