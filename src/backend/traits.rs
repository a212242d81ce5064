//! Core abstraction traits for the graphics context and shader programs
//!
//! These traits define the narrow surface the renderer needs from the host's
//! graphics context. The crate itself carries no GPU API dependency; the host
//! implements [`GlContext`] and [`ShaderProgram`] over its own bindings.

use std::ops::Range;

use glam::Mat4;
use thiserror::Error;

use crate::backend::types::{AttributeFormat, AttributeSemantic};

/// Shader build or bind error, carrying the context's diagnostic string.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("shader compilation failed: {0}")]
    Compile(String),
    #[error("program link failed: {0}")]
    Link(String),
    #[error("program bind failed")]
    Bind,
}

pub type ShaderResult<T> = Result<T, ShaderError>;

/// Handle to a GPU buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Handle to a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// Shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// The graphics context surface consumed by the renderer.
///
/// Buffer and vertex-array operations follow bind-then-operate semantics:
/// uploads and attribute pointers act on the currently bound object, and a
/// vertex array captures the element binding and attribute configuration
/// made while it is bound. The client-array operations exist for contexts
/// without vertex-array support and take their data as transient slices
/// valid only for the duration of the call and the draw that follows.
pub trait GlContext {
    /// Whether vertex array objects are available in this context.
    fn supports_vertex_arrays(&mut self) -> bool;

    // Buffer objects

    /// Create a buffer object.
    fn create_buffer(&mut self) -> BufferHandle;

    /// Delete a buffer object.
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Bind (or unbind with `None`) the array-buffer target.
    fn bind_array_buffer(&mut self, buffer: Option<BufferHandle>);

    /// Bind (or unbind with `None`) the element-buffer target.
    fn bind_index_buffer(&mut self, buffer: Option<BufferHandle>);

    /// Upload data to the bound array buffer.
    fn upload_array_buffer(&mut self, data: &[u8]);

    /// Upload data to the bound element buffer.
    fn upload_index_buffer(&mut self, data: &[u8]);

    // Vertex array objects

    /// Create a vertex array object.
    fn create_vertex_array(&mut self) -> VertexArrayHandle;

    /// Delete a vertex array object.
    fn delete_vertex_array(&mut self, array: VertexArrayHandle);

    /// Bind (or unbind with `None`) a vertex array object.
    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>);

    // Attribute configuration

    /// Enable a vertex attribute slot.
    fn enable_attribute(&mut self, slot: u32);

    /// Disable a vertex attribute slot.
    fn disable_attribute(&mut self, slot: u32);

    /// Point an attribute slot into the bound array buffer.
    fn attribute_pointer(&mut self, slot: u32, format: AttributeFormat, stride: u32, offset: u32);

    // Draws

    /// Draw triangles from the bound element buffer over a range of u16
    /// indices (`indices.start` is the first index, not a byte offset).
    fn draw_indexed(&mut self, indices: Range<u32>);

    // Client-side arrays (array-emulation mode)

    /// Enable a client-array channel.
    fn enable_client_array(&mut self, semantic: AttributeSemantic);

    /// Disable a client-array channel.
    fn disable_client_array(&mut self, semantic: AttributeSemantic);

    /// Point a client-array channel into CPU-resident vertex data.
    fn client_pointer(
        &mut self,
        semantic: AttributeSemantic,
        format: AttributeFormat,
        stride: u32,
        offset: u32,
        data: &[u8],
    );

    /// Draw triangles from a CPU-resident index slice through the client
    /// arrays set up by [`client_pointer`](Self::client_pointer).
    fn draw_indexed_slice(&mut self, indices: &[u16]);

    // Legacy matrix stacks

    /// Load a matrix into the fixed-function projection stack.
    fn load_projection_matrix(&mut self, matrix: Mat4);

    /// Load a matrix into the fixed-function modelview stack.
    fn load_modelview_matrix(&mut self, matrix: Mat4);
}

/// One shader program as provided by the host's shader toolchain.
///
/// Compile, link, and bind failures carry the toolchain's diagnostic string
/// in the returned [`ShaderError`]; uniform setters act on the currently
/// bound program and are infallible (setting an unknown uniform is a no-op,
/// as in the underlying APIs).
pub trait ShaderProgram {
    /// Compile and attach one stage from source.
    fn compile(&mut self, stage: ShaderStage, source: &str) -> ShaderResult<()>;

    /// Link the attached stages.
    fn link(&mut self) -> ShaderResult<()>;

    /// Make this program current.
    fn bind(&mut self) -> ShaderResult<()>;

    /// Release this program from the current state.
    fn release(&mut self);

    /// Set a 4x4 matrix uniform by name.
    fn set_uniform_mat4(&mut self, name: &str, value: Mat4);

    /// Set a scalar integer uniform by name (texture units, flags).
    fn set_uniform_i32(&mut self, name: &str, value: i32);
}
