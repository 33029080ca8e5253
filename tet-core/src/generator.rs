//! Recursive growth of a [`Tree`] of tetrahedra.
//!
//! Starting from a node, every side face may sprout a child tetrahedron
//! whose base is that face. Face 0 always sprouts, which keeps the trunk
//! continuous; faces 1 and 2 sprout with a probability that grows with
//! height. Each child is fully grown before the next face is considered,
//! so the order of random draws is:
//!
//! 1. branch roll for the face (faces 1 and 2 only),
//! 2. rotation draws around x, y and z,
//! 3. everything drawn by the child's subtree.
//!
//! Reordering any of these changes the shape produced by a given seed.

use crate::{
    config::GrowthRules,
    error::TreeError,
    tetrahedron::Tetrahedron,
    tree::Tree,
    types::{NodeId, SIDE_FACES},
};
use glam::Quat;
use rand::Rng;

/// Grows a whole tree from `root`, `max_depth` levels deep.
///
/// ### Errors
/// Returns the first [`TreeError`] hit while growing; the partial tree is dropped.
pub fn generate_tree(
    root: Tetrahedron,
    max_depth: i32,
    rules: &GrowthRules,
    rng: &mut impl Rng,
) -> Result<Tree, TreeError> {
    let mut tree = Tree::new(root);
    generate(&mut tree, Tree::ROOT, max_depth, rules, rng)?;
    Ok(tree)
}

/// Grows children below `node` until `remaining_depth` is used up.
///
/// All three faces of a node share the same budget: each child recurses
/// with `remaining_depth - 1`. Nothing happens when `remaining_depth <= 0`.
///
/// ### Parameters
/// - `tree` - Arena the new nodes are appended to.
/// - `node` - Node whose faces are considered; it must have no children yet.
/// - `remaining_depth` - Levels still allowed below `node`.
/// - `rules` - Height-driven growth constants.
/// - `rng` - The single random stream for this run.
pub fn generate(
    tree: &mut Tree,
    node: NodeId,
    remaining_depth: i32,
    rules: &GrowthRules,
    rng: &mut impl Rng,
) -> Result<(), TreeError> {
    if remaining_depth <= 0 {
        return Ok(());
    }

    let chance = rules.branch_chance(tree.nodes[node].tet.basepos.y);

    for face in 0..SIDE_FACES {
        if face != 0 && rng.random::<f32>() >= chance {
            continue;
        }

        let child = grow_branch(&tree.nodes[node].tet, face, rules, rng)?;
        let child_id = tree.attach_child(node, face, child);
        generate(tree, child_id, remaining_depth - 1, rules, rng)?;
    }

    Ok(())
}

/// Builds the tetrahedron that grows out of side `face` of `parent`.
///
/// The child's base is the parent face with its vertices reversed, so the
/// shared face is wound the other way round from the child's point of view.
pub fn grow_branch(
    parent: &Tetrahedron,
    face: usize,
    rules: &GrowthRules,
    rng: &mut impl Rng,
) -> Result<Tetrahedron, TreeError> {
    let height = parent.basepos.y;
    let verts = parent.face(face);

    let basepos = parent.face_avg(face);
    let mut dir = rules.branch_length * (parent.dir + parent.face_normal(face));
    dir = random_rotation(rules.max_deviation(height), rng) * dir;
    dir.y += rules.upward_strength(height);

    Tetrahedron::new(verts[2], verts[1], verts[0], basepos + dir)
}

/// Rotation by three uniform angles in `[0, max_degrees)` around x, y and z.
///
/// Draws x, then y, then z. The rotations are applied z first, then x, then y.
fn random_rotation(max_degrees: f32, rng: &mut impl Rng) -> Quat {
    let x = rng.random::<f32>() * max_degrees;
    let y = rng.random::<f32>() * max_degrees;
    let z = rng.random::<f32>() * max_degrees;
    euler_degrees(x, y, z)
}

fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_rotation_y(y.to_radians())
        * Quat::from_rotation_x(x.to_radians())
        * Quat::from_rotation_z(z.to_radians())
}
