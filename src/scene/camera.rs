//! Camera transform
//!
//! Orientation, position, and orbit distance with two view-matrix
//! composition policies. Every mutation recomputes the view matrix under
//! the active policy and pushes it to the attached [`MatrixConsumer`], so
//! the consumer never sees a stale view.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;

use crate::scene::matrices::MatrixConsumer;

/// View-matrix composition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Translate, then rotate yaw, pitch, roll.
    #[default]
    Direct,
    /// Translate back by `distance`, rotate roll, pitch, yaw, then
    /// translate by `position`: the camera looks at a pivot offset by
    /// `position` from a point `distance` behind it.
    Orbit,
}

/// Camera state and its derived view matrix.
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,
    distance: f32,
    mode: CameraMode,
    view: Mat4,
    consumer: Option<Arc<Mutex<dyn MatrixConsumer>>>,
}

impl Camera {
    /// Camera at the origin with no rotation, in [`CameraMode::Direct`].
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            distance: 0.0,
            mode: CameraMode::default(),
            view: Mat4::IDENTITY,
            consumer: None,
        }
    }

    /// Attach a consumer and push the current view matrix to it.
    pub fn attach(&mut self, consumer: Arc<Mutex<dyn MatrixConsumer>>) {
        consumer.lock().set_view(self.view);
        self.consumer = Some(consumer);
    }

    /// Detach the consumer; mutations keep updating the cached view.
    pub fn detach(&mut self) {
        self.consumer = None;
    }

    /// Switch composition policy and recompute immediately.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
        self.refresh();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh();
    }

    pub fn add_position(&mut self, delta: Vec3) {
        self.position += delta;
        self.refresh();
    }

    /// Set all three angles (degrees, normalized modulo 360).
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.yaw = yaw % 360.0;
        self.pitch = pitch % 360.0;
        self.roll = roll % 360.0;
        self.refresh();
    }

    /// Add to all three angles (degrees, normalized modulo 360).
    pub fn add_rotation(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.yaw = (self.yaw + yaw) % 360.0;
        self.pitch = (self.pitch + pitch) % 360.0;
        self.roll = (self.roll + roll) % 360.0;
        self.refresh();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw % 360.0;
        self.refresh();
    }

    pub fn add_yaw(&mut self, yaw: f32) {
        self.yaw = (self.yaw + yaw) % 360.0;
        self.refresh();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch % 360.0;
        self.refresh();
    }

    pub fn add_pitch(&mut self, pitch: f32) {
        self.pitch = (self.pitch + pitch) % 360.0;
        self.refresh();
    }

    pub fn set_roll(&mut self, roll: f32) {
        self.roll = roll % 360.0;
        self.refresh();
    }

    pub fn add_roll(&mut self, roll: f32) {
        self.roll = (self.roll + roll) % 360.0;
        self.refresh();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
        self.refresh();
    }

    /// Add to the orbit distance, clamping at zero.
    pub fn add_distance(&mut self, delta: f32) {
        self.distance += delta;
        if self.distance < 0.0 {
            self.distance = 0.0;
        }
        self.refresh();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The view matrix as of the last mutation.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn refresh(&mut self) {
        self.view = self.compute_view();
        if let Some(consumer) = &self.consumer {
            consumer.lock().set_view(self.view);
        }
    }

    fn compute_view(&self) -> Mat4 {
        let yaw = Mat4::from_rotation_y(self.yaw.to_radians());
        let pitch = Mat4::from_rotation_x(self.pitch.to_radians());
        let roll = Mat4::from_rotation_z(self.roll.to_radians());
        match self.mode {
            CameraMode::Direct => Mat4::from_translation(self.position) * yaw * pitch * roll,
            CameraMode::Orbit => {
                Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
                    * roll
                    * pitch
                    * yaw
                    * Mat4::from_translation(self.position)
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
