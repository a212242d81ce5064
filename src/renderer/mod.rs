//! Dual-pipeline model renderer
//!
//! One facade, two mutually exclusive rendering strategies behind the
//! [`RenderPipeline`] trait: GPU-resident buffer objects with vertex arrays,
//! or CPU-resident client arrays for contexts without vertex-array-object
//! support. The mode flag is only consulted where a strategy is selected;
//! everything else goes through the shared contract.

pub mod buffer_objects;
pub mod client_arrays;

pub use buffer_objects::BufferObjectPipeline;
pub use client_arrays::ClientArrayPipeline;

use crate::backend::traits::GlContext;
use crate::batch::{build_geometry, GeometryBatch, TextureGroup};
use crate::mesh::MeshSource;
use crate::shading::VariantBinder;
use crate::RenderMode;

/// Shared contract of the two rendering strategies.
pub trait RenderPipeline<C: GlContext> {
    /// Consume a build's output: upload it into GPU objects, or retain the
    /// CPU arrays for per-draw pointer setup.
    fn upload(&mut self, ctx: &mut C, batch: GeometryBatch);

    /// Draw every non-empty variant range of one group.
    fn draw_group(
        &mut self,
        ctx: &mut C,
        binder: Option<&mut dyn VariantBinder>,
        group: &TextureGroup,
    );

    /// Release everything this strategy holds. Safe to call redundantly and
    /// before the first upload.
    fn cleanup(&mut self, ctx: &mut C);
}

/// Strategy wrapper dispatching to the active pipeline.
enum Pipeline {
    BufferObjects(BufferObjectPipeline),
    ClientArrays(ClientArrayPipeline),
}

impl Pipeline {
    fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::BufferObjects => Pipeline::BufferObjects(BufferObjectPipeline::new()),
            RenderMode::ClientArrays => Pipeline::ClientArrays(ClientArrayPipeline::new()),
        }
    }

    fn upload<C: GlContext>(&mut self, ctx: &mut C, batch: GeometryBatch) {
        match self {
            Pipeline::BufferObjects(pipeline) => pipeline.upload(ctx, batch),
            Pipeline::ClientArrays(pipeline) => pipeline.upload(ctx, batch),
        }
    }

    fn draw_group<C: GlContext>(
        &mut self,
        ctx: &mut C,
        binder: Option<&mut dyn VariantBinder>,
        group: &TextureGroup,
    ) {
        match self {
            Pipeline::BufferObjects(pipeline) => pipeline.draw_group(ctx, binder, group),
            Pipeline::ClientArrays(pipeline) => pipeline.draw_group(ctx, binder, group),
        }
    }

    fn cleanup<C: GlContext>(&mut self, ctx: &mut C) {
        match self {
            Pipeline::BufferObjects(pipeline) => pipeline.cleanup(ctx),
            Pipeline::ClientArrays(pipeline) => pipeline.cleanup(ctx),
        }
    }
}

/// Batches a mesh and draws its texture groups through the active strategy.
pub struct ModelRenderer {
    mode: RenderMode,
    groups: Vec<TextureGroup>,
    pipeline: Pipeline,
    vertex_array_support: Option<bool>,
}

impl ModelRenderer {
    /// Create a renderer with no built geometry.
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            groups: Vec::new(),
            pipeline: Pipeline::for_mode(mode),
            vertex_array_support: None,
        }
    }

    /// The strategy currently in effect (after any capability fallback).
    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch strategies, releasing the current one's resources first.
    ///
    /// Groups from the previous build are cleared along with the resources
    /// they index into, so rendering is a no-op until the next
    /// [`rebuild`](Self::rebuild).
    pub fn set_render_mode<C: GlContext>(&mut self, ctx: &mut C, mode: RenderMode) {
        if mode == self.mode {
            return;
        }
        self.pipeline.cleanup(ctx);
        self.groups.clear();
        self.mode = mode;
        self.pipeline = Pipeline::for_mode(mode);
    }

    /// Number of texture groups in the current build.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Texture identifier of one group ([`NO_TEXTURE`](crate::mesh::NO_TEXTURE)
    /// for the untextured bucket), or -1 when the index is invalid.
    pub fn texture_of(&self, group: usize) -> i32 {
        self.groups.get(group).map_or(-1, |g| g.texture)
    }

    /// Release the previous build and batch the given mesh from scratch.
    ///
    /// `reference` supplies vertex positions and defaults to `mesh`. An
    /// absent `mesh` leaves the renderer empty. In buffer-object mode the
    /// context is first checked (once) for vertex-array support; without it
    /// the renderer permanently falls back to client arrays.
    pub fn rebuild<C: GlContext>(
        &mut self,
        ctx: &mut C,
        mesh: Option<&dyn MeshSource>,
        reference: Option<&dyn MeshSource>,
    ) {
        self.cleanup(ctx);

        if self.mode == RenderMode::BufferObjects && !self.vertex_arrays_supported(ctx) {
            self.mode = RenderMode::ClientArrays;
            self.pipeline = Pipeline::for_mode(RenderMode::ClientArrays);
        }

        if mesh.is_none() {
            return;
        }
        let batch = build_geometry(mesh, reference);
        self.groups = batch.groups.clone();
        self.pipeline.upload(ctx, batch);
    }

    /// Draw one texture group. Invalid indices and empty ranges are silent
    /// no-ops. In buffer-object mode an attached binder selects the shader
    /// variant per draw; draws whose variant is unusable are skipped.
    pub fn render<C: GlContext>(
        &mut self,
        ctx: &mut C,
        binder: Option<&mut dyn VariantBinder>,
        group: usize,
    ) {
        let Some(group) = self.groups.get(group) else {
            return;
        };
        let group = group.clone();
        self.pipeline.draw_group(ctx, binder, &group);
    }

    /// Release all GPU or CPU resources and forget the current build.
    pub fn cleanup<C: GlContext>(&mut self, ctx: &mut C) {
        self.pipeline.cleanup(ctx);
        self.groups.clear();
    }

    /// Resolve vertex-array support once and cache the answer for the
    /// renderer's lifetime.
    fn vertex_arrays_supported<C: GlContext>(&mut self, ctx: &mut C) -> bool {
        match self.vertex_array_support {
            Some(supported) => supported,
            None => {
                let supported = ctx.supports_vertex_arrays();
                if !supported {
                    log::warn!(
                        "vertex array objects unavailable; falling back to client-array rendering"
                    );
                }
                self.vertex_array_support = Some(supported);
                supported
            }
        }
    }
}
