//! Projection/view/model matrix handling
//!
//! [`MatrixHandler`] owns the three matrices and applies them either by
//! broadcasting through a [`ShaderSet`] or, on the legacy path, by loading
//! them straight into the context's fixed-function matrix stacks (where the
//! modelview stack receives `view * model`).

use glam::{Mat4, Vec3, Vec4};

use crate::backend::traits::GlContext;
use crate::shading::MatrixTarget;

/// Receives view-matrix updates pushed by a camera.
pub trait MatrixConsumer {
    fn set_view(&mut self, view: Mat4);
}

/// Projection, view, and model matrices with dual application paths.
#[derive(Debug, Clone)]
pub struct MatrixHandler {
    projection: Mat4,
    view: Mat4,
    model: Mat4,
    legacy: bool,
}

impl MatrixHandler {
    /// Identity matrices; `legacy` selects the fixed-function path.
    pub fn new(legacy: bool) -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            legacy,
        }
    }

    /// Switch between the shader and fixed-function application paths.
    pub fn use_legacy(&mut self, legacy: bool) {
        self.legacy = legacy;
    }

    /// Replace the projection with a perspective matrix (GL depth range).
    pub fn set_perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, near, far);
    }

    /// Replace the projection with an explicit frustum (GL depth range).
    pub fn set_frustum(&mut self, left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) {
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -(2.0 * far * near) / (far - near);
        self.projection = Mat4::from_cols(
            Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
            Vec4::new(a, b, c, -1.0),
            Vec4::new(0.0, 0.0, d, 0.0),
        );
    }

    /// Replace the view matrix.
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Compose the model matrix from a position and per-axis rotation in
    /// degrees, rotating z then x then y before translating.
    pub fn set_model_position(&mut self, position: Vec3, rotation_degrees: Vec3) {
        self.model = Mat4::from_rotation_z(rotation_degrees.z.to_radians())
            * Mat4::from_rotation_x(rotation_degrees.x.to_radians())
            * Mat4::from_rotation_y(rotation_degrees.y.to_radians())
            * Mat4::from_translation(position);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Apply projection and view through the active path.
    pub fn apply<C: GlContext>(&self, ctx: &mut C, mut shaders: Option<&mut dyn MatrixTarget>) {
        self.apply_projection(ctx, shaders.as_deref_mut());
        self.apply_view(ctx, shaders.as_deref_mut());
    }

    /// Apply the projection matrix through the active path.
    pub fn apply_projection<C: GlContext>(
        &self,
        ctx: &mut C,
        shaders: Option<&mut (dyn MatrixTarget + '_)>,
    ) {
        if self.legacy {
            ctx.load_projection_matrix(self.projection);
        } else if let Some(shaders) = shaders {
            shaders.set_projection(self.projection);
        }
    }

    /// Apply the view matrix. The legacy modelview stack receives the
    /// combined `view * model`.
    pub fn apply_view<C: GlContext>(
        &self,
        ctx: &mut C,
        shaders: Option<&mut (dyn MatrixTarget + '_)>,
    ) {
        if self.legacy {
            ctx.load_modelview_matrix(self.view * self.model);
        } else if let Some(shaders) = shaders {
            shaders.set_view(self.view);
        }
    }

    /// Apply the model matrix. The legacy modelview stack receives the
    /// combined `view * model`.
    pub fn apply_model<C: GlContext>(&self, ctx: &mut C, shaders: Option<&mut dyn MatrixTarget>) {
        if self.legacy {
            ctx.load_modelview_matrix(self.view * self.model);
        } else if let Some(shaders) = shaders {
            shaders.set_model(self.model);
        }
    }
}

impl Default for MatrixHandler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MatrixConsumer for MatrixHandler {
    fn set_view(&mut self, view: Mat4) {
        MatrixHandler::set_view(self, view);
    }
}
