//! Graphics context abstraction
//!
//! The renderer talks to the GPU exclusively through the traits in this
//! module. Two families of operations exist side by side: buffer objects and
//! vertex arrays for the modern pipeline, and client-side array primitives
//! for contexts that lack vertex-array-object support.

pub mod traits;
pub mod types;

pub use traits::{
    BufferHandle, GlContext, ShaderError, ShaderProgram, ShaderResult, ShaderStage,
    VertexArrayHandle,
};
pub use types::{AttributeFormat, AttributeSemantic, VertexAttribute, VertexLayout};
