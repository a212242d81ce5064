//! Geometry batching
//!
//! Converts a polygon mesh into compact, deduplicated vertex/index buffers
//! partitioned by texture assignment and vertex layout variant. The output
//! [`GeometryBatch`] feeds either rendering pipeline unchanged.

pub mod builder;
pub mod tables;
pub mod vertex;

pub use builder::{build_geometry, GeometryBatch, TextureGroup, TEX_COORD_SCALE};
pub use tables::{DedupTable, VariantTables};
pub use vertex::{
    BasicVertex, NormalTexturedVertex, NormalVertex, TexturedVertex, VertexVariant, VARIANT_COUNT,
};
