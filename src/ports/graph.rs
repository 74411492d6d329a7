//! Project-graph port — boundary to the monorepo's project store.

use crate::generator::descriptor::ProjectDescriptor;

/// Registers project descriptors with the monorepo's project graph.
///
/// The graph store owns descriptor persistence and target execution; the
/// generator only hands over a finished, immutable descriptor.
pub trait ProjectGraph: Send + Sync {
    /// Adds (or replaces) a project in the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be committed to the store.
    fn add_project(
        &self,
        descriptor: &ProjectDescriptor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
