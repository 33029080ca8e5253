use crate::tetrahedron::Tetrahedron;
use crate::types::{NodeId, SIDE_FACES};

/// One tetrahedron in a [`Tree`] together with its per-face child slots.
///
/// `children[i]` holds the node grown on side face `i`, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct TetrahedronNode {
    pub tet: Tetrahedron,
    pub children: [Option<NodeId>; SIDE_FACES],
}

/// Arena of tetrahedron nodes rooted at id `0`.
///
/// Nodes only reference their children, never their parent, and a node is
/// attached exactly once, so the structure is always an acyclic tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub nodes: Vec<TetrahedronNode>,
}

impl TetrahedronNode {
    pub fn new(tet: Tetrahedron) -> Self {
        Self {
            tet,
            children: [None; SIDE_FACES],
        }
    }

    pub fn is_leaf_face(&self, face: usize) -> bool {
        self.children[face].is_none()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root: Tetrahedron) -> Self {
        Self {
            nodes: vec![TetrahedronNode::new(root)],
        }
    }

    pub fn root(&self) -> &TetrahedronNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TetrahedronNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores `tet` as the child grown on `face` of `parent`.
    ///
    /// ### Panics
    /// Panics if `parent` is out of bounds or the slot is already occupied.
    pub fn attach_child(&mut self, parent: NodeId, face: usize, tet: Tetrahedron) -> NodeId {
        assert!(
            self.nodes[parent].children[face].is_none(),
            "face {face} of node {parent} already has a child"
        );
        let id = self.nodes.len();
        self.nodes.push(TetrahedronNode::new(tet));
        self.nodes[parent].children[face] = Some(id);
        id
    }

    /// Number of levels below the root; a lone root has depth `0`.
    pub fn depth(&self) -> usize {
        fn walk(tree: &Tree, id: NodeId) -> usize {
            tree.nodes[id]
                .children
                .iter()
                .flatten()
                .map(|&child| 1 + walk(tree, child))
                .max()
                .unwrap_or(0)
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(self, Self::ROOT)
        }
    }

    /// Side faces without a child, i.e. the faces a flattened mesh renders.
    pub fn leaf_face_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| (0..SIDE_FACES).filter(|&face| n.is_leaf_face(face)).count())
            .sum()
    }
}
