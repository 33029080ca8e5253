//! Owner of the current tree and its mesh, and the entry point hosts call
//! to (re)build them.

use crate::{
    config::Config,
    error::TreeError,
    generator,
    mesh::{self, MeshBuffers, MeshSink},
    tetrahedron::Tetrahedron,
    tree::Tree,
};
use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// The tetrahedron every tree grows from, sitting on the ground plane.
pub fn canonical_root() -> Result<Tetrahedron, TreeError> {
    Tetrahedron::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.25, 1.0, 0.25),
    )
}

/// Builds trees from a [`Config`] and keeps the latest successful result.
///
/// ### Fields
/// - `config` - Settings for the next [`TetrahedronTree::regenerate`]. When
///   `use_random_seed` is set, `config.seed` is overwritten with the seed
///   that was actually used.
/// - `tree` - Tree from the last successful run, if any.
/// - `mesh` - Buffers flattened from `tree`.
#[derive(Debug, Default)]
pub struct TetrahedronTree {
    pub config: Config,
    tree: Option<Tree>,
    mesh: MeshBuffers,
}

impl TetrahedronTree {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tree: None,
            mesh: MeshBuffers::default(),
        }
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Replaces the tree and mesh with a freshly grown pair and uploads the
    /// mesh into `sink`.
    ///
    /// On error nothing is replaced and `sink` is not touched, so whatever
    /// was published before stays on screen.
    pub fn regenerate(&mut self, sink: &mut impl MeshSink) -> Result<&MeshBuffers, TreeError> {
        let _span = tracing::info_span!("regenerate").entered();

        if let Err(err) = self.config.validate() {
            tracing::warn!(%err, "rejected tree configuration");
            return Err(err);
        }

        if self.config.use_random_seed {
            self.config.seed = rand::rng().random();
        }
        if self.config.max_depth < 0 {
            tracing::warn!(
                max_depth = self.config.max_depth,
                "negative max depth, growing a single tetrahedron"
            );
        }

        let seed = self.config.seed;
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let tree = match generator::generate_tree(
            canonical_root()?,
            self.config.effective_depth(),
            &self.config.rules,
            &mut rng,
        ) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(seed, %err, "tree generation failed, keeping previous tree");
                return Err(err);
            }
        };

        let mesh = mesh::flatten(&tree);
        tracing::info!(
            seed,
            nodes = tree.len(),
            depth = tree.depth(),
            triangles = mesh.triangle_count(),
            "tree regenerated"
        );

        sink.upload(&mesh);
        self.tree = Some(tree);
        self.mesh = mesh;
        Ok(&self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthRules;

    #[derive(Default)]
    struct RecordingSink {
        uploads: Vec<MeshBuffers>,
    }

    impl MeshSink for RecordingSink {
        fn upload(&mut self, mesh: &MeshBuffers) {
            self.uploads.push(mesh.clone());
        }
    }

    fn config(seed: i32, max_depth: i32) -> Config {
        Config {
            seed,
            max_depth,
            ..Config::default()
        }
    }

    #[test]
    fn canonical_root_sits_on_the_ground() {
        let root = canonical_root().unwrap();
        assert_eq!(root.basepos.y, 0.0);
        assert_eq!(root.vertices[3], Vec3::new(0.25, 1.0, 0.25));
    }

    #[test]
    fn regenerate_publishes_mesh_to_sink() {
        let mut driver = TetrahedronTree::new(config(0, 0));
        let mut sink = RecordingSink::default();

        let triangles = driver.regenerate(&mut sink).unwrap().triangle_count();

        assert_eq!(triangles, 3);
        assert_eq!(sink.uploads.len(), 1);
        assert_eq!(&sink.uploads[0], driver.mesh());
        assert_eq!(driver.tree().map(Tree::len), Some(1));
    }

    #[test]
    fn seed_42_depth_1_yields_five_triangles() {
        let mut driver = TetrahedronTree::new(config(42, 1));
        let mut sink = RecordingSink::default();

        driver.regenerate(&mut sink).unwrap();

        let tree = driver.tree().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(driver.mesh().triangle_count(), 5);
    }

    #[test]
    fn fixed_seed_regenerates_identical_tree() {
        let mut driver = TetrahedronTree::new(config(2024, 6));
        let mut sink = RecordingSink::default();

        driver.regenerate(&mut sink).unwrap();
        let first = driver.tree().cloned();
        driver.regenerate(&mut sink).unwrap();

        assert_eq!(driver.tree().cloned(), first);
        assert_eq!(sink.uploads[0], sink.uploads[1]);
    }

    #[test]
    fn random_seed_is_recorded_and_reproducible() {
        let mut driver = TetrahedronTree::new(Config {
            use_random_seed: true,
            max_depth: 5,
            ..Config::default()
        });
        let mut sink = RecordingSink::default();

        driver.regenerate(&mut sink).unwrap();
        let used = driver.config.seed;

        let mut replay = TetrahedronTree::new(config(used, 5));
        replay.regenerate(&mut sink).unwrap();

        assert_eq!(replay.tree(), driver.tree());
    }

    #[test]
    fn negative_depth_grows_single_tetrahedron() {
        let mut driver = TetrahedronTree::new(config(1, -3));
        let mut sink = RecordingSink::default();

        driver.regenerate(&mut sink).unwrap();

        assert_eq!(driver.tree().map(Tree::len), Some(1));
        assert_eq!(driver.mesh().triangle_count(), 3);
    }

    #[test]
    fn failed_regeneration_keeps_previous_state() {
        let mut driver = TetrahedronTree::new(config(7, 3));
        let mut sink = RecordingSink::default();
        driver.regenerate(&mut sink).unwrap();
        let tree_before = driver.tree().cloned();
        let mesh_before = driver.mesh().clone();

        driver.config.rules = GrowthRules {
            branch_length: 0.0,
            upward_offset: 0.0,
            ..GrowthRules::default()
        };
        let err = driver.regenerate(&mut sink).unwrap_err();

        assert!(matches!(err, TreeError::DegenerateGeometry { .. }));
        assert_eq!(driver.tree().cloned(), tree_before);
        assert_eq!(driver.mesh(), &mesh_before);
        assert_eq!(sink.uploads.len(), 1);
    }

    #[test]
    fn invalid_rules_are_rejected_before_generation() {
        let mut driver = TetrahedronTree::new(config(7, 3));
        driver.config.rules.upward_slope = f32::INFINITY;
        let mut sink = RecordingSink::default();

        let err = driver.regenerate(&mut sink).unwrap_err();

        assert!(matches!(err, TreeError::InvalidConfiguration(_)));
        assert!(driver.tree().is_none());
        assert!(sink.uploads.is_empty());
    }
}
