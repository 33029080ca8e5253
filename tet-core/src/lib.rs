//! Core library for growing tree-like solids out of tetrahedra.
//!
//! Main components:
//! - [`tetrahedron`] — the tetrahedron primitive and its face geometry.
//! - [`tree`] — arena of tetrahedron nodes with per-face child slots.
//! - [`generator`] — recursive, seeded growth of a tree.
//! - [`mesh`] — flattening a tree into triangle buffers, and the sink trait.
//! - [`driver`] — owns the current tree/mesh and regenerates on demand.
//! - [`config`] — driver settings and growth rules.
//! - [`error`] — the crate error type.
//! - [`types`] — shared type aliases and constants.

pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod mesh;
pub mod tetrahedron;
pub mod tree;
pub mod types;

pub use driver::TetrahedronTree;
pub use error::TreeError;
pub use mesh::{MeshBuffers, MeshSink};
