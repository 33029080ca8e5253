use thiserror::Error;

/// Errors produced while building a tetrahedron tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The apex sits (almost) on the base centroid, so no growth direction exists.
    #[error("degenerate tetrahedron: apex is {length} away from the base centroid")]
    DegenerateGeometry { length: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
