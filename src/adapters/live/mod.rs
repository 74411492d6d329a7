//! Live adapters for real external interactions.

pub mod filesystem;
pub mod graph;

pub use filesystem::LiveFileSystem;
pub use graph::FileProjectGraph;
