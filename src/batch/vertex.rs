//! Vertex layout variants and their interleaved records
//!
//! Four fixed layouts cover every face the builder can meet, selected by the
//! presence of a normal channel and a texture-coordinate channel. Records are
//! `#[repr(C)]` and byte-cast for upload and for content-addressed
//! deduplication, so field order here is the wire layout.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::backend::types::{AttributeFormat, AttributeSemantic, VertexAttribute, VertexLayout};

/// Number of vertex layout variants.
pub const VARIANT_COUNT: usize = 4;

/// One of the four vertex layouts, indexed by
/// `has_normal as usize + is_textured as usize * 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum VertexVariant {
    /// Position + color.
    Basic = 0,
    /// Position + normal + color.
    Normal = 1,
    /// Position + color + texture coordinates.
    Textured = 2,
    /// Position + normal + color + texture coordinates.
    NormalTextured = 3,
}

impl VertexVariant {
    /// All variants in index order.
    pub const ALL: [Self; VARIANT_COUNT] = [
        Self::Basic,
        Self::Normal,
        Self::Textured,
        Self::NormalTextured,
    ];

    /// Select the variant for a face's channel set.
    pub fn from_flags(has_normal: bool, is_textured: bool) -> Self {
        Self::ALL[has_normal as usize + is_textured as usize * 2]
    }

    /// Variant index in `0..4`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the layout carries a normal channel.
    pub fn has_normal(self) -> bool {
        self.index() & 1 != 0
    }

    /// Whether the layout carries a texture-coordinate channel.
    pub fn is_textured(self) -> bool {
        self.index() & 2 != 0
    }

    /// Stride in bytes of this variant's record.
    pub fn stride(self) -> u32 {
        match self {
            Self::Basic => std::mem::size_of::<BasicVertex>() as u32,
            Self::Normal => std::mem::size_of::<NormalVertex>() as u32,
            Self::Textured => std::mem::size_of::<TexturedVertex>() as u32,
            Self::NormalTextured => std::mem::size_of::<NormalTexturedVertex>() as u32,
        }
    }

    /// Interleaved attribute layout of this variant's record.
    pub fn layout(self) -> VertexLayout {
        let position = |offset| VertexAttribute {
            semantic: AttributeSemantic::Position,
            format: AttributeFormat::Float32x3,
            offset,
        };
        let normal = |offset| VertexAttribute {
            semantic: AttributeSemantic::Normal,
            format: AttributeFormat::Float32x3,
            offset,
        };
        let color = |offset| VertexAttribute {
            semantic: AttributeSemantic::Color,
            format: AttributeFormat::Unorm8x4,
            offset,
        };
        let tex_coord = |offset| VertexAttribute {
            semantic: AttributeSemantic::TexCoord,
            format: AttributeFormat::Float32x2,
            offset,
        };

        let attributes = match self {
            Self::Basic => vec![position(0), color(12)],
            Self::Normal => vec![position(0), normal(12), color(24)],
            Self::Textured => vec![position(0), color(12), tex_coord(16)],
            Self::NormalTextured => vec![position(0), normal(12), color(24), tex_coord(28)],
        };

        VertexLayout {
            stride: self.stride(),
            attributes,
        }
    }
}

/// Position + color record (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BasicVertex {
    pub position: Vec3,
    pub color: [u8; 4],
}

/// Position + normal + color record (28 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct NormalVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: [u8; 4],
}

/// Position + color + texcoord record (24 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: Vec3,
    pub color: [u8; 4],
    pub uv: Vec2,
}

/// Position + normal + color + texcoord record (36 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct NormalTexturedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: [u8; 4],
    pub uv: Vec2,
}
