//! Interactive tetrahedron-tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the tree driver, the mesh it
//! publishes to, and an orbit camera, and implements [`eframe::App`] to
//! draw the mesh and expose the generation settings.

use crate::camera::{FocusPoint, OrbitCamera};
use eframe::App;
use glam::{Quat, Vec3};
use tet_core::{
    MeshBuffers, MeshSink, TetrahedronTree, config::GrowthRules, mesh::face_normal_gizmos,
};

/// Direction the scene is lit from.
const LIGHT_DIR: Vec3 = Vec3::new(0.36, 0.86, -0.36);
const BARK: [f32; 3] = [150.0, 190.0, 120.0];
const GIZMO_LENGTH: f32 = 0.1;
/// Only drags with this button orbit the camera.
const ORBIT_BUTTON: egui::PointerButton = egui::PointerButton::Primary;

/// Copy of the last mesh published by the driver, ready for drawing.
#[derive(Debug, Default)]
pub struct UploadedMesh {
    pub mesh: MeshBuffers,
    pub uploads: usize,
}

impl MeshSink for UploadedMesh {
    fn upload(&mut self, mesh: &MeshBuffers) {
        self.mesh.clone_from(mesh);
        self.uploads += 1;
    }
}

/// Main application state for the interactive viewer.
///
/// ### Fields
/// - `driver` - Generation settings plus the current tree and mesh.
/// - `uploaded` - The sink the driver publishes into; this is what gets drawn.
/// - `camera` - Orbit camera around the tree.
/// - `sensitivity` - Mouse drag multiplier.
/// - `show_normals` - Whether face normal gizmos are drawn.
/// - `gizmos` - Cached gizmo segments for the current tree.
/// - `last_error` - Message of the last failed regeneration, if any.
pub struct Viewer {
    driver: TetrahedronTree,
    uploaded: UploadedMesh,
    camera: OrbitCamera,
    sensitivity: f32,
    show_normals: bool,
    gizmos: Vec<[Vec3; 2]>,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer and grows the first tree with the default settings.
    pub fn new() -> Self {
        let focus = FocusPoint {
            position: Vec3::new(0.4, 2.0, 0.4),
            rotation: Quat::from_rotation_x(20f32.to_radians()),
            yaw_limit: 180.0,
            pitch_limit: 60.0,
        };

        let mut viewer = Self {
            driver: TetrahedronTree::default(),
            uploaded: UploadedMesh::default(),
            camera: OrbitCamera::new(focus, 8.0),
            sensitivity: 1.0,
            show_normals: false,
            gizmos: Vec::new(),
            last_error: None,
        };
        viewer.create_tree();
        viewer
    }

    /// Regenerates the tree and refreshes the drawn mesh.
    ///
    /// On failure the previous mesh stays on screen and the error is shown
    /// in the status bar.
    fn create_tree(&mut self) {
        let outcome = self.driver.regenerate(&mut self.uploaded).map(|_| ());
        match outcome {
            Ok(()) => {
                self.last_error = None;
                self.gizmos = self
                    .driver
                    .tree()
                    .map(|tree| face_normal_gizmos(tree, GIZMO_LENGTH))
                    .unwrap_or_default();
            }
            Err(err) => {
                tracing::error!(%err, "could not create tree");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the left-hand "Tree Demo" panel with the generation settings.
    fn ui_tree_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("tree_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Tree Demo");

                let cfg = &mut self.driver.config;
                ui.checkbox(&mut cfg.use_random_seed, "Random seed");
                ui.horizontal(|ui| {
                    ui.label("seed:");
                    ui.add_enabled(!cfg.use_random_seed, egui::DragValue::new(&mut cfg.seed));
                });
                ui.horizontal(|ui| {
                    ui.label("max_depth:");
                    ui.add(egui::DragValue::new(&mut cfg.max_depth).range(0..=10));
                });

                ui.separator();
                ui.label("Growth rules");
                let rules = &mut cfg.rules;
                Self::labeled_drag_f32(
                    ui,
                    "chance / height:",
                    &mut rules.branch_chance_per_height,
                    0.0..=1.0,
                    0.005,
                );
                Self::labeled_drag_f32(
                    ui,
                    "branch_length:",
                    &mut rules.branch_length,
                    0.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "deviation / height:",
                    &mut rules.deviation_per_height,
                    0.0..=90.0,
                    0.1,
                );
                Self::labeled_drag_f32(
                    ui,
                    "upward_slope:",
                    &mut rules.upward_slope,
                    -5.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "upward_offset:",
                    &mut rules.upward_offset,
                    -5.0..=5.0,
                    0.05,
                );
                if ui.button("Reset rules").clicked() {
                    *rules = GrowthRules::default();
                }

                ui.separator();
                if ui.button("Create Tree").clicked() {
                    self.create_tree();
                }

                ui.separator();
                ui.checkbox(&mut self.show_normals, "Show normals");
                Self::labeled_drag_f32(
                    ui,
                    "sensitivity:",
                    &mut self.sensitivity,
                    0.1..=5.0,
                    0.05,
                );
            });
    }

    /// Builds the bottom status bar (seed, tree size, uploads, last error).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("uploads = {}", self.uploaded.uploads));
                ui.label(format!("triangles = {}", self.uploaded.mesh.triangle_count()));
                ui.label(format!(
                    "nodes = {}",
                    self.driver.tree().map_or(0, |tree| tree.len())
                ));
                ui.label(format!("seed = {}", self.driver.config.seed));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
            });
        });
    }

    /// Depth-sorted, flat-shaded triangles of the uploaded mesh.
    fn build_scene(&self, rect: egui::Rect) -> egui::Mesh {
        let mut tris = Vec::with_capacity(self.uploaded.mesh.triangle_count());
        for (verts, normal) in self.uploaded.mesh.triangles() {
            let [Some(a), Some(b), Some(c)] = verts.map(|v| self.camera.project(v, rect)) else {
                continue;
            };
            let depth = (a.1 + b.1 + c.1) / 3.0;
            tris.push((depth, [a.0, b.0, c.0], shade(normal)));
        }

        // Far triangles first so near ones paint over them.
        tris.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut mesh = egui::Mesh::default();
        for (_, points, color) in tris {
            let base = mesh.vertices.len() as u32;
            for p in points {
                mesh.colored_vertex(p, color);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        mesh
    }

    /// Orbits the camera for a drag of `delta` pixels with `button` held.
    ///
    /// Drags with anything but [`ORBIT_BUTTON`] are ignored. The drag is
    /// scaled so that moving across the full `view_height` turns 360 degrees.
    fn orbit_drag(&mut self, button: egui::PointerButton, delta: egui::Vec2, view_height: f32) {
        if button != ORBIT_BUTTON {
            return;
        }
        let scale = self.sensitivity * (360.0 / view_height.max(1.0));
        let delta = delta * scale;
        self.camera.move_by(delta.x, delta.y);
    }

    /// Builds the central panel where the tree is drawn and orbited.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            let dragging = [
                egui::PointerButton::Primary,
                egui::PointerButton::Secondary,
                egui::PointerButton::Middle,
            ]
            .into_iter()
            .find(|&button| response.dragged_by(button));
            if let Some(button) = dragging {
                self.orbit_drag(button, response.drag_delta(), rect.height());
            }

            if response.hovered() {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll > 0.0 {
                    self.camera.zoom_in();
                } else if scroll < 0.0 {
                    self.camera.zoom_out();
                }
            }

            let dt = ctx.input(|i| i.stable_dt);
            self.camera.update(dt);

            painter.add(egui::Shape::mesh(self.build_scene(rect)));

            if self.show_normals {
                let stroke = egui::Stroke::new(1.0, egui::Color32::RED);
                for [start, end] in &self.gizmos {
                    if let (Some((a, _)), Some((b, _))) = (
                        self.camera.project(*start, rect),
                        self.camera.project(*end, rect),
                    ) {
                        painter.line_segment([a, b], stroke);
                    }
                }
            }

            if !self.camera.is_settled() {
                ctx.request_repaint();
            }
        });
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_tree_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}

/// Lambert-style brightness of a face, with a floor so back faces stay visible.
fn shade(normal: Vec3) -> egui::Color32 {
    let k = 0.35 + 0.65 * normal.dot(LIGHT_DIR.normalize()).max(0.0);
    let [r, g, b] = BARK.map(|c| (c * k).round().clamp(0.0, 255.0) as u8);
    egui::Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tet_core::config::Config;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn new_viewer_uploads_first_tree() {
        let viewer = Viewer::new();

        assert_eq!(viewer.uploaded.uploads, 1);
        assert_eq!(&viewer.uploaded.mesh, viewer.driver.mesh());
        assert!(viewer.uploaded.mesh.triangle_count() > 0);
        assert_eq!(
            viewer.gizmos.len(),
            viewer.driver.tree().map_or(0, |t| t.len()) * 3
        );
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn create_tree_with_fixed_seed_republishes_same_mesh() {
        let mut viewer = Viewer::new();
        let before = viewer.uploaded.mesh.clone();

        viewer.create_tree();

        assert_eq!(viewer.uploaded.uploads, 2);
        assert_eq!(viewer.uploaded.mesh, before);
    }

    #[test]
    fn failed_create_tree_keeps_drawn_mesh() {
        let mut viewer = Viewer::new();
        let before = viewer.uploaded.mesh.clone();

        viewer.driver.config.rules.branch_length = f32::NAN;
        viewer.create_tree();

        assert_eq!(viewer.uploaded.uploads, 1);
        assert_eq!(viewer.uploaded.mesh, before);
        assert!(
            viewer
                .last_error
                .as_deref()
                .is_some_and(|msg| msg.contains("branch_length"))
        );
    }

    #[test]
    fn depth_zero_scene_draws_three_triangles() {
        let mut viewer = Viewer::new();
        viewer.driver.config = Config {
            max_depth: 0,
            ..Config::default()
        };
        viewer.create_tree();

        let scene = viewer.build_scene(test_rect());
        assert_eq!(scene.indices.len(), 9);
        assert_eq!(scene.vertices.len(), 9);
    }

    #[test]
    fn primary_drag_orbits_the_camera() {
        let mut viewer = Viewer::new();
        viewer.sensitivity = 1.0;

        // A quarter of the view height is a quarter turn.
        viewer.orbit_drag(egui::PointerButton::Primary, egui::vec2(150.0, 0.0), 600.0);

        assert!((viewer.camera.yaw_degrees() - 90.0).abs() < 1e-2);
    }

    #[test]
    fn other_buttons_do_not_orbit_the_camera() {
        let mut viewer = Viewer::new();
        let yaw = viewer.camera.yaw_degrees();
        let pitch = viewer.camera.pitch_degrees();

        for button in [egui::PointerButton::Secondary, egui::PointerButton::Middle] {
            viewer.orbit_drag(button, egui::vec2(150.0, 40.0), 600.0);
        }

        assert_eq!(viewer.camera.yaw_degrees(), yaw);
        assert_eq!(viewer.camera.pitch_degrees(), pitch);
    }

    #[test]
    fn uploaded_mesh_counts_uploads() {
        let mut sink = UploadedMesh::default();
        let mesh = MeshBuffers::default();

        sink.upload(&mesh);
        sink.upload(&mesh);

        assert_eq!(sink.uploads, 2);
        assert!(sink.mesh.is_empty());
    }

    #[test]
    fn shade_is_brighter_toward_the_light() {
        let lit = shade(LIGHT_DIR.normalize());
        let unlit = shade(-LIGHT_DIR.normalize());
        assert!(lit.g() > unlit.g());
    }
}
