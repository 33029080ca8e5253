use crate::error::TreeError;
use crate::types::SIDE_FACES;
use glam::Vec3;

/// Shortest apex-to-base distance accepted by [`Tetrahedron::new`].
pub const MIN_DIR_LENGTH: f32 = 1e-6;

/// A triangular pyramid: three base vertices plus an apex at index 3.
///
/// `basepos` and `dir` are derived once at construction and never change.
/// The vertex order is kept exactly as given, since it fixes the winding of
/// every side face.
#[derive(Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    pub vertices: [Vec3; 4],
    /// Centroid of the base face (vertices 0, 1 and 2).
    pub basepos: Vec3,
    /// Unit direction from `basepos` toward the apex.
    pub dir: Vec3,
}

impl Tetrahedron {
    /// Builds a tetrahedron from base vertices `a`, `b`, `c` and apex `d`.
    ///
    /// ### Errors
    /// [`TreeError::DegenerateGeometry`] if the apex is closer than
    /// [`MIN_DIR_LENGTH`] to the base centroid.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Result<Self, TreeError> {
        let basepos = triangle_centroid(&[a, b, c]);
        let offset = d - basepos;
        let length = offset.length();
        if !(length >= MIN_DIR_LENGTH) {
            return Err(TreeError::DegenerateGeometry { length });
        }

        Ok(Self {
            vertices: [a, b, c, d],
            basepos,
            dir: offset / length,
        })
    }

    /// Vertices of side face `i`: `[v[i], apex, v[(i + 1) % 3]]`.
    ///
    /// ### Panics
    /// Panics if `i >= 3`.
    pub fn face(&self, i: usize) -> [Vec3; 3] {
        assert!(i < SIDE_FACES, "side face index out of range: {i}");
        [
            self.vertices[i],
            self.vertices[3],
            self.vertices[(i + 1) % SIDE_FACES],
        ]
    }

    /// Outward normal of side face `i`.
    pub fn face_normal(&self, i: usize) -> Vec3 {
        triangle_normal(&self.face(i))
    }

    /// Centroid of side face `i`.
    pub fn face_avg(&self, i: usize) -> Vec3 {
        triangle_centroid(&self.face(i))
    }
}

/// Normal of a triangle as `normalize(cross(v1 - v2, v1 - v0))`.
///
/// The operand order matters: it is what makes side faces point away from
/// the tetrahedron they belong to. Zero-area triangles yield `Vec3::ZERO`.
pub fn triangle_normal(verts: &[Vec3; 3]) -> Vec3 {
    let a = verts[1] - verts[0];
    let b = verts[1] - verts[2];
    b.cross(a).normalize_or_zero()
}

pub fn triangle_centroid(verts: &[Vec3; 3]) -> Vec3 {
    (verts[0] + verts[1] + verts[2]) * (1.0 / 3.0)
}
