//! In-memory adapters used as deterministic test doubles.

pub mod clock;
pub mod filesystem;
pub mod graph;
pub mod metadata;

pub use clock::FixedClock;
pub use filesystem::MemoryFileSystem;
pub use graph::MemoryProjectGraph;
pub use metadata::MemoryMetadataStore;
