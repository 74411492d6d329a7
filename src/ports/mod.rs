//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, filesystem, the monorepo project-graph store, the
//! transactional metadata store). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod graph;
pub mod metadata;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use graph::ProjectGraph;
pub use metadata::{MetadataRecord, MetadataStore, MetadataUpdate, TxDecision};
