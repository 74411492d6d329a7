//! In-memory project-graph store.

use std::sync::Mutex;

use crate::generator::descriptor::ProjectDescriptor;
use crate::ports::graph::ProjectGraph;

/// Project-graph store that records descriptors in memory.
#[derive(Default)]
pub struct MemoryProjectGraph {
    projects: Mutex<Vec<ProjectDescriptor>>,
}

impl MemoryProjectGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor registered under `name`, if any.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<ProjectDescriptor> {
        self.projects.lock().unwrap().iter().find(|p| p.name == name).cloned()
    }

    /// Returns every registered descriptor in registration order.
    #[must_use]
    pub fn projects(&self) -> Vec<ProjectDescriptor> {
        self.projects.lock().unwrap().clone()
    }
}

impl ProjectGraph for MemoryProjectGraph {
    fn add_project(
        &self,
        descriptor: &ProjectDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut projects = self.projects.lock().unwrap();
        // Re-registration replaces the previous descriptor, like the real store.
        projects.retain(|p| p.name != descriptor.name);
        projects.push(descriptor.clone());
        Ok(())
    }
}

/// Shared handle so tests can keep inspecting the graph after boxing it
/// into a context.
impl ProjectGraph for std::sync::Arc<MemoryProjectGraph> {
    fn add_project(
        &self,
        descriptor: &ProjectDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.as_ref().add_project(descriptor)
    }
}
