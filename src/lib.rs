//! meshbatch - a geometry-batching model renderer with dual pipelines
//!
//! The crate converts a polygon mesh (triangles and quads with optional
//! normals, per-vertex colors, and texture coordinates) into compact,
//! deduplicated vertex/index buffers partitioned by texture assignment, and
//! draws them through one of two mutually exclusive strategies:
//! - **Buffer objects**: GPU-resident vertex/index storage bound through
//!   vertex array objects, with per-variant shader programs
//! - **Client arrays**: CPU-resident storage submitted through transient
//!   client pointers each draw, for contexts without vertex-array-object
//!   support
//!
//! # Architecture
//! - [`mesh`]: the [`MeshSource`](mesh::MeshSource) trait the host
//!   implements over its model format
//! - [`batch`]: two-pass batching into four vertex layout variants with
//!   content-addressed deduplication
//! - [`renderer`]: the dual-pipeline renderer and its strategies
//! - [`shading`]: the four variant shader programs with synchronized
//!   uniform broadcast
//! - [`scene`]: camera transform and projection/view/model matrix handling
//! - [`backend`]: the graphics-context traits everything above draws
//!   through; the host supplies the implementation

pub mod backend;
pub mod batch;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod shading;

pub use backend::{BufferHandle, GlContext, ShaderProgram, VertexArrayHandle};
pub use batch::{build_geometry, GeometryBatch, TextureGroup, VertexVariant};
pub use mesh::{Face, FaceAttributes, MeshSource, NO_TEXTURE};
pub use renderer::ModelRenderer;
pub use scene::{Camera, CameraMode, MatrixHandler};
pub use shading::{MatrixTarget, ProgramSources, ShaderSet, VariantBinder};

/// Rendering strategy selection for [`ModelRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// GPU-resident buffer objects with vertex arrays (preferred).
    #[default]
    BufferObjects,
    /// CPU-resident client arrays for contexts without vertex-array-object
    /// support.
    ClientArrays,
}
