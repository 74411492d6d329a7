//! Dependency manifest discovery and append-only merging.
//!
//! The workspace `package.json` is process-wide state: it is read once,
//! merged into a pure value, and written once. The merge never lowers or
//! removes a version already present — only absent keys are added.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ports::filesystem::FileSystem;

/// Runtime and development dependency mappings of one `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManifest {
    /// Runtime dependencies: package identifier to version constraint.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies.
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl DependencyManifest {
    /// Overlays `other` on top of `self`, right-biased: entries in `other`
    /// win over the baseline.
    #[must_use]
    pub fn overlay(mut self, other: &DependencyManifest) -> DependencyManifest {
        self.dependencies.extend(other.dependencies.clone());
        self.dev_dependencies.extend(other.dev_dependencies.clone());
        self
    }
}

/// Built-in baseline for a Firebase functions project.
#[must_use]
pub fn default_functions_manifest() -> DependencyManifest {
    let dependencies = [("firebase-admin", "^13.2.0"), ("firebase-functions", "^6.0.1")];
    let dev_dependencies = [
        ("@typescript-eslint/eslint-plugin", "^5.12.0"),
        ("@typescript-eslint/parser", "^5.12.0"),
        ("eslint-config-google", "^0.14.0"),
        ("eslint-plugin-import", "^2.25.4"),
        ("firebase-functions-test", "^3.1.0"),
    ];
    DependencyManifest {
        dependencies: dependencies.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect(),
        dev_dependencies: dev_dependencies
            .iter()
            .map(|(k, v)| ((*k).into(), (*v).into()))
            .collect(),
    }
}

/// Loads the dependency manifest discovered in the source project.
///
/// Returns `None` when the file is absent; a malformed manifest is logged
/// and also treated as absent, never propagated.
#[must_use]
pub fn load_discovered(fs: &dyn FileSystem, path: &Path) -> Option<DependencyManifest> {
    if !fs.exists(path) {
        return None;
    }
    let contents = match fs.read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            log::warn!("Could not read functions package.json: {err}");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            log::warn!("Could not parse functions package.json: {err}");
            None
        }
    }
}

/// Adds absent keys from `incoming` to a manifest section.
///
/// Existing keys keep their value, whatever it is — the merge never
/// downgrades a version the workspace already pinned. Returns whether any
/// key was added.
fn merge_missing(section: &mut serde_json::Map<String, Value>, incoming: &BTreeMap<String, String>) -> bool {
    let mut added = false;
    for (package, version) in incoming {
        if !section.contains_key(package) {
            section.insert(package.clone(), Value::String(version.clone()));
            added = true;
        }
    }
    added
}

/// Merges `incoming` into the workspace `package.json` using the append-only
/// rule, preserving every unrelated field.
///
/// A missing or malformed workspace manifest is logged and skipped — the run
/// proceeds with degraded results. Returns whether any key was added.
///
/// # Errors
///
/// Returns an error only if writing the updated manifest fails.
pub fn update_workspace_manifest(
    fs: &dyn FileSystem,
    workspace_root: &Path,
    incoming: &DependencyManifest,
) -> Result<bool, String> {
    let path = workspace_root.join("package.json");
    if !fs.exists(&path) {
        log::warn!("No workspace package.json found at {}; skipping dependency merge", path.display());
        return Ok(false);
    }
    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            log::warn!("Could not read workspace package.json: {err}");
            return Ok(false);
        }
    };
    let mut manifest: Value = match serde_json::from_str(&contents) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(_) => {
            log::warn!("Workspace package.json is not a JSON object; skipping dependency merge");
            return Ok(false);
        }
        Err(err) => {
            log::warn!("Could not parse workspace package.json: {err}");
            return Ok(false);
        }
    };

    let mut added = false;
    for (field, incoming_section) in [
        ("dependencies", &incoming.dependencies),
        ("devDependencies", &incoming.dev_dependencies),
    ] {
        let object = manifest
            .as_object_mut()
            .and_then(|m| {
                m.entry(field).or_insert_with(|| Value::Object(serde_json::Map::new())).as_object_mut()
            });
        if let Some(section) = object {
            added |= merge_missing(section, incoming_section);
        } else {
            log::warn!("Workspace package.json field {field} is not an object; left untouched");
        }
    }

    let mut json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize workspace package.json: {e}"))?;
    json.push('\n');
    fs.write(&path, &json)
        .map_err(|e| format!("Failed to write workspace package.json: {e}"))?;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn overlay_is_right_biased() {
        let discovered = DependencyManifest {
            dependencies: [("firebase-admin".into(), "^12.1.0".into())].into(),
            dev_dependencies: BTreeMap::new(),
        };
        let merged = default_functions_manifest().overlay(&discovered);
        assert_eq!(merged.dependencies["firebase-admin"], "^12.1.0");
        assert_eq!(merged.dependencies["firebase-functions"], "^6.0.1");
    }

    #[test]
    fn merge_never_lowers_an_existing_version() {
        let fs = MemoryFileSystem::new();
        fs.seed("/ws/package.json", r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let incoming = DependencyManifest {
            dependencies: [("a".into(), "^2.0.0".into())].into(),
            dev_dependencies: BTreeMap::new(),
        };

        let added = update_workspace_manifest(&fs, Path::new("/ws"), &incoming).unwrap();

        assert!(!added);
        let value: Value =
            serde_json::from_str(&fs.read_to_string(Path::new("/ws/package.json")).unwrap())
                .unwrap();
        assert_eq!(value["dependencies"]["a"], "^1.0.0");
    }

    #[test]
    fn merge_adds_absent_keys_and_reports_them() {
        let fs = MemoryFileSystem::new();
        fs.seed("/ws/package.json", r#"{"name": "ws", "dependencies": {"left-pad": "1.0.0"}}"#);

        let added =
            update_workspace_manifest(&fs, Path::new("/ws"), &default_functions_manifest())
                .unwrap();

        assert!(added);
        let value: Value =
            serde_json::from_str(&fs.read_to_string(Path::new("/ws/package.json")).unwrap())
                .unwrap();
        assert_eq!(value["name"], "ws");
        assert_eq!(value["dependencies"]["left-pad"], "1.0.0");
        assert_eq!(value["dependencies"]["firebase-admin"], "^13.2.0");
        assert_eq!(value["devDependencies"]["firebase-functions-test"], "^3.1.0");
    }

    #[test]
    fn missing_workspace_manifest_is_skipped() {
        let fs = MemoryFileSystem::new();
        let added =
            update_workspace_manifest(&fs, Path::new("/ws"), &default_functions_manifest())
                .unwrap();
        assert!(!added);
        assert!(!fs.exists(Path::new("/ws/package.json")));
    }

    #[test]
    fn malformed_workspace_manifest_is_skipped() {
        let fs = MemoryFileSystem::new();
        fs.seed("/ws/package.json", "{ broken");
        let added =
            update_workspace_manifest(&fs, Path::new("/ws"), &default_functions_manifest())
                .unwrap();
        assert!(!added);
        assert_eq!(fs.read_to_string(Path::new("/ws/package.json")).unwrap(), "{ broken");
    }

    #[test]
    fn malformed_discovered_manifest_is_treated_as_absent() {
        let fs = MemoryFileSystem::new();
        fs.seed("/init/functions/package.json", "nonsense");
        assert!(load_discovered(&fs, Path::new("/init/functions/package.json")).is_none());
    }

    #[test]
    fn discovered_manifest_parses_both_sections() {
        let fs = MemoryFileSystem::new();
        fs.seed(
            "/init/functions/package.json",
            r#"{"name": "functions", "dependencies": {"firebase-admin": "^12.1.0"}, "devDependencies": {"typescript": "^4.9.0"}}"#,
        );
        let manifest = load_discovered(&fs, Path::new("/init/functions/package.json")).unwrap();
        assert_eq!(manifest.dependencies["firebase-admin"], "^12.1.0");
        assert_eq!(manifest.dev_dependencies["typescript"], "^4.9.0");
    }
}
