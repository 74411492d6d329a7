//! Live project-graph adapter writing `project.json` files.

use std::path::PathBuf;

use crate::generator::descriptor::ProjectDescriptor;
use crate::ports::graph::ProjectGraph;

/// Project-graph store backed by per-project `project.json` files under a
/// workspace root, the layout the monorepo tooling reads back.
pub struct FileProjectGraph {
    workspace_root: PathBuf,
}

impl FileProjectGraph {
    /// Creates a graph store rooted at the given workspace directory.
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }
}

impl ProjectGraph for FileProjectGraph {
    fn add_project(
        &self,
        descriptor: &ProjectDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = self.workspace_root.join(&descriptor.root).join("project.json");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(descriptor)?;
        json.push('\n');
        Ok(std::fs::write(path, json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::descriptor::ProjectDescriptor;

    #[test]
    fn writes_project_json_under_descriptor_root() {
        let dir = tempfile::tempdir().unwrap();
        let graph = FileProjectGraph::new(dir.path().to_path_buf());

        let descriptor = ProjectDescriptor {
            name: "demo-firebase".into(),
            root: "apps/demo/firebase".into(),
            project_type: "application".into(),
            source_root: None,
            tags: vec!["type:firebase".into()],
            targets: std::collections::BTreeMap::new(),
        };
        graph.add_project(&descriptor).unwrap();

        let written =
            std::fs::read_to_string(dir.path().join("apps/demo/firebase/project.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["name"], "demo-firebase");
        assert_eq!(value["projectType"], "application");
        assert!(written.ends_with('\n'));
    }
}
