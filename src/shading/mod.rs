//! Shader binding layer
//!
//! Four programs, one per vertex layout variant, indexed the same way as the
//! variants themselves (`has_normal + is_textured * 2`) so the renderer can
//! pick the program matching the buffers it is about to draw. A program that
//! fails to build stays in the set as a permanent no-op target; the renderer
//! skips draws that would need it.

use glam::Mat4;

use crate::backend::traits::{ShaderProgram, ShaderStage};
use crate::batch::vertex::{VertexVariant, VARIANT_COUNT};

const UNIFORM_PROJECTION: &str = "ProjectionMatrix";
const UNIFORM_VIEW: &str = "ViewMatrix";
const UNIFORM_MODEL: &str = "ModelMatrix";
const UNIFORM_COLOR_TEXTURE: &str = "colorTexture";

/// Vertex and fragment source for one variant's program.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Uniform-broadcast surface as seen by the matrix handler.
pub trait MatrixTarget {
    fn set_projection(&mut self, projection: Mat4);
    fn set_view(&mut self, view: Mat4);
    fn set_model(&mut self, model: Mat4);
}

/// Per-variant shader binding as seen by the renderer.
pub trait VariantBinder {
    /// Whether the variant's program built successfully.
    fn variant_ready(&self, variant: VertexVariant) -> bool;

    /// Bind the variant's program. `false` means the variant is unusable
    /// and the draw referencing it must be skipped.
    fn bind_variant(&mut self, variant: VertexVariant) -> bool;
}

/// The four variant programs with synchronized uniform broadcast.
pub struct ShaderSet<P: ShaderProgram> {
    programs: [P; VARIANT_COUNT],
    ready: [bool; VARIANT_COUNT],
}

impl<P: ShaderProgram> ShaderSet<P> {
    /// Wrap four unbuilt programs, indexed by variant.
    pub fn new(programs: [P; VARIANT_COUNT]) -> Self {
        Self {
            programs,
            ready: [false; VARIANT_COUNT],
        }
    }

    /// Compile, link, and bind all four programs.
    ///
    /// A failure on any stage is logged with the toolchain diagnostic and
    /// leaves that slot unusable; the remaining programs still build. The
    /// textured variants get their sampler uniform bound to unit 0.
    pub fn initialize(&mut self, sources: &[ProgramSources<'_>; VARIANT_COUNT]) {
        log::info!("building model shader programs");
        for (index, sources) in sources.iter().enumerate() {
            self.ready[index] = build_program(&mut self.programs[index], index, sources);
        }

        for variant in [VertexVariant::Textured, VertexVariant::NormalTextured] {
            let index = variant.index();
            if self.ready[index] && self.programs[index].bind().is_ok() {
                self.programs[index].set_uniform_i32(UNIFORM_COLOR_TEXTURE, 0);
            }
        }
        log::info!(
            "model shader programs ready: {}/{}",
            self.ready.iter().filter(|r| **r).count(),
            VARIANT_COUNT
        );
    }

    /// Whether one variant's program is usable.
    pub fn ready(&self, variant: VertexVariant) -> bool {
        self.ready[variant.index()]
    }

    /// Bind one variant's program, logging on failure.
    pub fn bind(&mut self, variant: VertexVariant) -> bool {
        let index = variant.index();
        if !self.ready[index] {
            return false;
        }
        match self.programs[index].bind() {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "could not bind shader program ({}, {}): {err}",
                    if variant.has_normal() {
                        "has normal"
                    } else {
                        "no normal"
                    },
                    if variant.is_textured() {
                        "has texture"
                    } else {
                        "no texture"
                    },
                );
                false
            }
        }
    }

    /// Release every program from the current state.
    pub fn release_all(&mut self) {
        for program in &mut self.programs {
            program.release();
        }
    }

    /// Read access to one variant's program.
    pub fn program(&self, variant: VertexVariant) -> &P {
        &self.programs[variant.index()]
    }

    /// Broadcast a projection matrix to all usable programs.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.broadcast(UNIFORM_PROJECTION, projection);
    }

    /// Broadcast a view matrix to all usable programs.
    pub fn set_view(&mut self, view: Mat4) {
        self.broadcast(UNIFORM_VIEW, view);
    }

    /// Broadcast a model matrix to all usable programs.
    pub fn set_model(&mut self, model: Mat4) {
        self.broadcast(UNIFORM_MODEL, model);
    }

    /// Bind each usable program in turn, set the uniform, and release it,
    /// keeping all variants consistent without tracking which is current.
    fn broadcast(&mut self, name: &str, value: Mat4) {
        for (program, ready) in self.programs.iter_mut().zip(self.ready) {
            if !ready || program.bind().is_err() {
                continue;
            }
            program.set_uniform_mat4(name, value);
            program.release();
        }
    }
}

impl<P: ShaderProgram> MatrixTarget for ShaderSet<P> {
    fn set_projection(&mut self, projection: Mat4) {
        ShaderSet::set_projection(self, projection);
    }

    fn set_view(&mut self, view: Mat4) {
        ShaderSet::set_view(self, view);
    }

    fn set_model(&mut self, model: Mat4) {
        ShaderSet::set_model(self, model);
    }
}

impl<P: ShaderProgram> VariantBinder for ShaderSet<P> {
    fn variant_ready(&self, variant: VertexVariant) -> bool {
        self.ready(variant)
    }

    fn bind_variant(&mut self, variant: VertexVariant) -> bool {
        self.bind(variant)
    }
}

/// Run one program through compile/link/bind, logging the first failure.
fn build_program<P: ShaderProgram>(
    program: &mut P,
    index: usize,
    sources: &ProgramSources<'_>,
) -> bool {
    if let Err(err) = program.compile(ShaderStage::Vertex, sources.vertex) {
        log::warn!("could not build vertex shader {index}: {err}");
        return false;
    }
    if let Err(err) = program.compile(ShaderStage::Fragment, sources.fragment) {
        log::warn!("could not build fragment shader {index}: {err}");
        return false;
    }
    if let Err(err) = program.link() {
        log::warn!("could not link shader program {index}: {err}");
        return false;
    }
    if let Err(err) = program.bind() {
        log::warn!("could not bind shader program {index}: {err}");
        return false;
    }
    true
}
