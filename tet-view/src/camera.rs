//! Orbit camera that circles a focus point, with optional angle limits.

use glam::{EulerRot, Quat, Vec3};

/// Vertical field of view used by [`OrbitCamera::project`], in degrees.
const FOV_Y_DEGREES: f32 = 60.0;
/// Points closer than this to the camera plane are not projected.
const NEAR: f32 = 0.05;

/// What the camera orbits around, and how far it may swing away.
///
/// Limits are the maximum deviation in degrees from `rotation`, in either
/// direction. A limit of `180` or more leaves that axis unconstrained.
#[derive(Clone, Copy, Debug)]
pub struct FocusPoint {
    pub position: Vec3,
    pub rotation: Quat,
    pub yaw_limit: f32,
    pub pitch_limit: f32,
}

impl Default for FocusPoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            yaw_limit: 45.0,
            pitch_limit: 45.0,
        }
    }
}

impl FocusPoint {
    fn yaw_pitch(&self) -> (Quat, Quat) {
        let (yaw, pitch, _) = self.rotation.to_euler(EulerRot::YXZ);
        (Quat::from_rotation_y(yaw), Quat::from_rotation_x(pitch))
    }
}

/// Damped orbit camera.
///
/// `yaw` and `pitch` hold the desired orientation; `rotation` trails them
/// in [`OrbitCamera::update`]. The camera sits `distance` behind the focus
/// along its own forward axis (`+Z`) and projects with `+X` to the right,
/// i.e. a left-handed view.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub focus: FocusPoint,
    pub distance: f32,
    pub damping: f32,
    yaw: Quat,
    pitch: Quat,
    pub rotation: Quat,
    pub position: Vec3,
}

impl OrbitCamera {
    /// Creates a camera already settled on the focus orientation.
    pub fn new(focus: FocusPoint, distance: f32) -> Self {
        let (yaw, pitch) = focus.yaw_pitch();
        let rotation = yaw * pitch;
        Self {
            focus,
            distance,
            damping: 2.0,
            yaw,
            pitch,
            rotation,
            position: focus.position + rotation * (Vec3::NEG_Z * distance),
        }
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.yaw.to_euler(EulerRot::YXZ).0.to_degrees()
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch.to_euler(EulerRot::YXZ).1.to_degrees()
    }

    pub fn zoom_in(&mut self) {
        self.distance *= 0.5;
    }

    pub fn zoom_out(&mut self) {
        self.distance *= 2.0;
    }

    /// Turns the desired orientation by the given angles in degrees.
    pub fn move_by(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw *= Quat::from_rotation_y(yaw_delta.to_radians());
        self.pitch *= Quat::from_rotation_x(pitch_delta.to_radians());
        self.apply_constraints();
    }

    /// Pulls yaw and pitch back toward the focus orientation, just far
    /// enough to land on the limit.
    fn apply_constraints(&mut self) {
        let (focus_yaw, focus_pitch) = self.focus.yaw_pitch();
        if self.focus.yaw_limit < 180.0 {
            self.yaw = pull_within(self.yaw, focus_yaw, self.focus.yaw_limit);
        }
        if self.focus.pitch_limit < 180.0 {
            self.pitch = pull_within(self.pitch, focus_pitch, self.focus.pitch_limit);
        }
    }

    /// Moves `rotation` toward the desired orientation and repositions the
    /// camera. `dt` is the frame time in seconds.
    pub fn update(&mut self, dt: f32) {
        let target = self.yaw * self.pitch;
        self.rotation = self
            .rotation
            .lerp(target, (dt * self.damping).clamp(0.0, 1.0));
        self.position = self.focus.position + self.rotation * (Vec3::NEG_Z * self.distance);
    }

    /// `true` once `rotation` has (nearly) caught up with the desired orientation.
    pub fn is_settled(&self) -> bool {
        self.rotation.dot(self.yaw * self.pitch).abs() > 1.0 - 1e-6
    }

    /// Perspective-projects `point` into `rect`.
    ///
    /// ### Returns
    /// The screen position and the view depth, or `None` if the point is
    /// behind (or too close to) the camera.
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let local = self.rotation.inverse() * (point - self.position);
        if local.z < NEAR {
            return None;
        }

        let focal = rect.height() * 0.5 / (FOV_Y_DEGREES.to_radians() * 0.5).tan();
        let center = rect.center();
        Some((
            egui::pos2(
                center.x + local.x / local.z * focal,
                center.y - local.y / local.z * focal,
            ),
            local.z,
        ))
    }
}

fn pull_within(current: Quat, target: Quat, limit_degrees: f32) -> Quat {
    let difference = current.angle_between(target).to_degrees();
    let overflow = difference - limit_degrees;
    if overflow > 0.0 {
        current.slerp(target, overflow / difference)
    } else {
        current
    }
}
