//! Service context bundling the generator's port trait objects.

use std::path::Path;

use crate::adapters::live::{FileProjectGraph, LiveFileSystem};
use crate::ports::filesystem::FileSystem;
use crate::ports::graph::ProjectGraph;

/// Bundles the generator's external boundaries into a single context.
///
/// Each field provides access to one external system. Constructors wire up
/// different adapter implementations (live disk I/O, or in-memory doubles
/// built through [`ServiceContext::new`] in tests).
pub struct ServiceContext {
    /// Filesystem for reading the init directory and writing the workspace.
    pub fs: Box<dyn FileSystem>,
    /// Project-graph store receiving finished descriptors.
    pub graph: Box<dyn ProjectGraph>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, graph: Box<dyn ProjectGraph>) -> Self {
        Self { fs, graph }
    }

    /// Creates a live context: real disk I/O and a `project.json`-file graph
    /// store rooted at the workspace.
    #[must_use]
    pub fn live(workspace_root: &Path) -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            graph: Box::new(FileProjectGraph::new(workspace_root.to_path_buf())),
        }
    }
}
