/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance. The root is always `0`.
pub type NodeId = usize;

/// Number of side faces of a tetrahedron, and so the number of child slots per node.
pub const SIDE_FACES: usize = 3;
