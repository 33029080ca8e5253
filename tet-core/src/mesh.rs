//! Flattening a [`Tree`] into renderable triangle buffers.
//!
//! Only faces without a child are visible: a face with a child is glued to
//! that child's base and lies inside the solid. Every visible face becomes
//! its own triangle with three fresh vertices, so the buffers never share
//! vertices between triangles.

use crate::{
    tree::Tree,
    types::{NodeId, SIDE_FACES},
};
use glam::{Vec2, Vec3};

/// Parallel vertex streams plus a triangle index list.
///
/// `positions`, `normals` and `uvs` always have the same length, and
/// `indices` holds one entry per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn with_triangle_capacity(triangles: usize) -> Self {
        let verts = triangles * 3;
        Self {
            positions: Vec::with_capacity(verts),
            normals: Vec::with_capacity(verts),
            uvs: Vec::with_capacity(verts),
            indices: Vec::with_capacity(verts),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one flat-shaded triangle with its own three vertices.
    pub fn push_triangle(&mut self, verts: [Vec3; 3], normal: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&verts);
        self.normals.extend_from_slice(&[normal; 3]);
        // Texturing is not supported yet; every vertex maps to the origin.
        self.uvs.extend_from_slice(&[Vec2::ZERO; 3]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Iterates `(positions, normal)` per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], Vec3)> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            (
                [self.positions[a], self.positions[b], self.positions[c]],
                self.normals[a],
            )
        })
    }
}

/// Receiver of finished mesh buffers, e.g. a GPU mesh or a viewer.
pub trait MeshSink {
    fn upload(&mut self, mesh: &MeshBuffers);
}

/// Emits one triangle per leaf face of `tree`, walking faces 0, 1, 2 in
/// pre-order from the root.
///
/// The tree is only read, so flattening the same tree twice yields the
/// same buffers.
pub fn flatten(tree: &Tree) -> MeshBuffers {
    let mut mesh = MeshBuffers::with_triangle_capacity(tree.leaf_face_count());
    if !tree.is_empty() {
        flatten_node(tree, Tree::ROOT, &mut mesh);
    }
    mesh
}

fn flatten_node(tree: &Tree, id: NodeId, mesh: &mut MeshBuffers) {
    let node = tree.node(id);
    for face in 0..SIDE_FACES {
        match node.children[face] {
            Some(child) => flatten_node(tree, child, mesh),
            None => mesh.push_triangle(node.tet.face(face), node.tet.face_normal(face)),
        }
    }
}

/// Line segments from each side-face centroid along its normal.
///
/// Covers every face of every node, including faces hidden by a child,
/// which makes it useful as a debug overlay of the face orientation.
pub fn face_normal_gizmos(tree: &Tree, length: f32) -> Vec<[Vec3; 2]> {
    let mut out = Vec::with_capacity(tree.len() * SIDE_FACES);
    for node in &tree.nodes {
        for face in 0..SIDE_FACES {
            let start = node.tet.face_avg(face);
            out.push([start, start + node.tet.face_normal(face) * length]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GrowthRules, driver::canonical_root, generator::generate_tree,
        tetrahedron::triangle_normal,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn grow(seed: u64, depth: i32) -> Tree {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_tree(canonical_root().unwrap(), depth, &GrowthRules::default(), &mut rng).unwrap()
    }

    #[test]
    fn single_tetrahedron_flattens_to_three_triangles() {
        let tree = grow(0, 0);
        let mesh = flatten(&tree);

        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.positions.len(), 9);
        assert_eq!(mesh.normals.len(), 9);
        assert_eq!(mesh.uvs, vec![Vec2::ZERO; 9]);
        assert_eq!(mesh.indices, (0..9).collect::<Vec<u32>>());

        let root = tree.root();
        for face in 0..SIDE_FACES {
            assert_eq!(&mesh.positions[face * 3..face * 3 + 3], &root.tet.face(face));
            assert_eq!(mesh.normals[face * 3], root.tet.face_normal(face));
        }
    }

    #[test]
    fn trunk_only_tree_renders_five_faces() {
        let mesh = flatten(&grow(42, 1));
        assert_eq!(mesh.triangle_count(), 5);
    }

    #[test]
    fn faces_with_children_are_not_emitted() {
        let tree = grow(42, 1);
        let mesh = flatten(&tree);
        let hidden = tree.root().tet.face(0);

        assert!(mesh.triangles().all(|(verts, _)| verts != hidden));
        // The child's own faces come first because face 0 recurses before faces 1 and 2.
        let child = tree.node(1);
        assert_eq!(&mesh.positions[0..3], &child.tet.face(0));
    }

    #[test]
    fn buffer_sizes_follow_leaf_face_count() {
        for seed in [3, 8, 21] {
            let tree = grow(seed, 6);
            let mesh = flatten(&tree);

            assert_eq!(mesh.indices.len(), 3 * tree.leaf_face_count());
            assert_eq!(mesh.positions.len(), mesh.indices.len());
            assert_eq!(mesh.normals.len(), mesh.indices.len());
            assert_eq!(mesh.uvs.len(), mesh.indices.len());
        }
    }

    #[test]
    fn indices_are_sequential_without_sharing() {
        let mesh = flatten(&grow(17, 5));
        let expected: Vec<u32> = (0..mesh.positions.len() as u32).collect();
        assert_eq!(mesh.indices, expected);
    }

    #[test]
    fn emitted_normals_match_emitted_winding() {
        let mesh = flatten(&grow(5, 6));

        for (verts, normal) in mesh.triangles() {
            let recomputed = triangle_normal(&verts);
            assert!(
                (recomputed - normal).length() < 1e-4,
                "normal {normal:?} does not match winding {recomputed:?}"
            );
        }
    }

    #[test]
    fn flatten_is_idempotent() {
        let tree = grow(64, 5);
        let before = tree.clone();

        assert_eq!(flatten(&tree), flatten(&tree));
        assert_eq!(tree, before);
    }

    #[test]
    fn gizmos_cover_every_face_of_every_node() {
        let tree = grow(42, 3);
        let gizmos = face_normal_gizmos(&tree, 0.1);

        assert_eq!(gizmos.len(), tree.len() * 3);
        for [start, end] in gizmos {
            assert!(((end - start).length() - 0.1).abs() < 1e-5);
        }
    }
}
