//! Functions sub-project creation and firebase.json retargeting.

use std::path::{Component, Path};

use serde_json::Value;

use crate::context::ServiceContext;
use crate::generator::descriptor::ProjectDescriptor;
use crate::generator::import::copy_tree;
use crate::generator::manifest::{
    default_functions_manifest, load_discovered, update_workspace_manifest,
};
use crate::generator::targets::{TargetDefinition, TargetOptions};

/// Result of creating the dependent functions sub-project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionsProject {
    /// Name of the sub-project registered in the graph.
    pub name: String,
    /// Whether the workspace manifest gained any dependency keys.
    pub dependencies_added: bool,
}

/// Creates the `<base>-functions` sub-project when the init directory has a
/// functions source tree.
///
/// Merges the discovered functions manifest (over the built-in baseline)
/// into the workspace manifest, imports the functions `src/` tree, and
/// registers the sub-project descriptor. Returns `None` with a warning when
/// the init directory has no `functions/` directory.
///
/// # Errors
///
/// Returns an error if the source import, manifest write, or descriptor
/// commit fails.
pub fn create_functions_project(
    ctx: &ServiceContext,
    base_name: &str,
    project_dir: &str,
    init_dir: &Path,
    workspace_root: &Path,
) -> Result<Option<FunctionsProject>, String> {
    let functions_source = init_dir.join("functions");
    if !ctx.fs.exists(&functions_source) {
        log::warn!("No functions directory found in init directory");
        return Ok(None);
    }

    let name = format!("{base_name}-functions");
    let functions_root = format!("{project_dir}/functions");

    let discovered =
        load_discovered(ctx.fs.as_ref(), &functions_source.join("package.json")).unwrap_or_default();
    let incoming = default_functions_manifest().overlay(&discovered);
    let dependencies_added = update_workspace_manifest(ctx.fs.as_ref(), workspace_root, &incoming)?;

    copy_tree(
        ctx.fs.as_ref(),
        &functions_source.join("src"),
        &workspace_root.join(&functions_root).join("src"),
        &[],
    )?;

    let descriptor = ProjectDescriptor {
        name: name.clone(),
        root: functions_root.clone(),
        project_type: "application".to_string(),
        source_root: Some(format!("{functions_root}/src")),
        tags: vec![
            format!("app:{base_name}"),
            format!("scope:{base_name}-firebase"),
            format!("group:{base_name}-functions"),
        ],
        targets: [
            ("build".to_string(), functions_build_target(base_name, &functions_root)),
            ("lint".to_string(), TargetDefinition::executor_only("@nx/eslint:lint")),
            ("test".to_string(), TargetDefinition::executor_only("@nx/vite:test")),
        ]
        .into(),
    };
    ctx.graph
        .add_project(&descriptor)
        .map_err(|e| format!("Failed to register functions project {name}: {e}"))?;

    Ok(Some(FunctionsProject { name, dependencies_added }))
}

fn functions_build_target(base_name: &str, functions_root: &str) -> TargetDefinition {
    TargetDefinition {
        executor: "@nx/esbuild:esbuild".to_string(),
        options: TargetOptions {
            output_path: Some(format!("dist/{base_name}/functions")),
            main: Some(format!("{functions_root}/src/index.ts")),
            ts_config: Some(format!("{functions_root}/tsconfig.app.json")),
            ..TargetOptions::default()
        },
        depends_on: Vec::new(),
    }
}

/// Rewrites the copied firebase.json for sub-project builds: each entry of a
/// `functions` array loses its `predeploy` commands and points `source` at
/// the build output under `dist/`, relative to the project root.
///
/// Leaves the file untouched (returning `false`) when it is missing or its
/// `functions` value is not an array.
///
/// # Errors
///
/// Returns an error if the copied file cannot be parsed or written back.
pub fn retarget_firebase_config(
    ctx: &ServiceContext,
    workspace_root: &Path,
    project_root: &str,
    base_name: &str,
) -> Result<bool, String> {
    let path = workspace_root.join(project_root).join("firebase.json");
    if !ctx.fs.exists(&path) {
        return Ok(false);
    }
    let contents = ctx
        .fs
        .read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let mut config: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;

    let dist_source = format!("{}dist/{base_name}/functions", ascent_prefix(project_root));
    let Some(entries) = config.get_mut("functions").and_then(Value::as_array_mut) else {
        return Ok(false);
    };
    for entry in entries.iter_mut() {
        if let Some(object) = entry.as_object_mut() {
            object.remove("predeploy");
            object.insert("source".to_string(), Value::String(dist_source.clone()));
        }
    }

    let mut json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
    json.push('\n');
    ctx.fs.write(&path, &json).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    Ok(true)
}

/// `../` once per component of the workspace-relative project root.
fn ascent_prefix(project_root: &str) -> String {
    let depth = Path::new(project_root)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();
    "../".repeat(depth)
}
