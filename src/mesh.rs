//! Mesh source interface
//!
//! The batching engine does not own mesh data. It reads faces, vertex
//! positions, normals, and the texture-usage list through the [`MeshSource`]
//! trait, which the host implements over whatever level/model format it
//! loads.

use bitflags::bitflags;
use glam::{Vec2, Vec3};

use crate::batch::VertexVariant;

/// Texture sentinel for faces and groups without a texture assignment.
pub const NO_TEXTURE: i32 = -1;

bitflags! {
    /// Per-face attribute bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaceAttributes: u32 {
        /// The face carries a normal (index 0 at minimum).
        const NORMAL = 1 << 0;
        /// Normals are per-vertex rather than a single face normal.
        const VERTEX_NORMAL = 1 << 1;
        /// The face is textured and carries texture coordinates.
        const TEXTURED = 1 << 2;
        /// Colors are per-vertex rather than a single face color.
        const VERTEX_COLOR = 1 << 3;
        /// The face is a quad (4 corners) instead of a triangle.
        const QUAD = 1 << 4;
    }
}

/// A single polygon face: a triangle or a quad.
///
/// Index slots 3 (`vertices[3]`, `normals[3]`, ...) are only meaningful when
/// [`FaceAttributes::QUAD`] is set. Colors and texture coordinates are stored
/// by value on the face; positions and normals are indices into the mesh
/// arrays. Texture coordinates are raw values in texel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub attributes: FaceAttributes,
    /// Texture identifier, or [`NO_TEXTURE`].
    pub texture: i32,
    pub vertices: [u32; 4],
    pub normals: [u32; 4],
    pub colors: [[u8; 3]; 4],
    pub tex_coords: [Vec2; 4],
}

impl Default for FaceAttributes {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for Face {
    fn default() -> Self {
        Self {
            attributes: FaceAttributes::empty(),
            texture: NO_TEXTURE,
            vertices: [0; 4],
            normals: [0; 4],
            colors: [[0; 3]; 4],
            tex_coords: [Vec2::ZERO; 4],
        }
    }
}

impl Face {
    /// Number of corners: 4 for quads, 3 otherwise.
    pub fn corner_count(&self) -> usize {
        if self.attributes.contains(FaceAttributes::QUAD) {
            4
        } else {
            3
        }
    }

    /// Whether the face contributes a normal channel (face or per-vertex).
    pub fn has_normals(&self) -> bool {
        self.attributes
            .intersects(FaceAttributes::NORMAL | FaceAttributes::VERTEX_NORMAL)
    }

    /// Whether the face carries texture coordinates.
    pub fn is_textured(&self) -> bool {
        self.attributes.contains(FaceAttributes::TEXTURED)
    }

    /// Vertex layout variant this face is emitted into.
    pub fn variant(&self) -> VertexVariant {
        VertexVariant::from_flags(self.has_normals(), self.is_textured())
    }
}

/// Read access to mesh data, implemented by the host's model format.
///
/// Accessors are index-based and must stay stable for the duration of a
/// build. Malformed data (out-of-range indices, faces referencing textures
/// absent from the usage list) is an upstream contract and is not validated
/// here.
pub trait MeshSource {
    /// Number of faces in the mesh.
    fn face_count(&self) -> usize;

    /// Face by index.
    fn face(&self, index: usize) -> Face;

    /// Vertex position by index.
    fn vertex(&self, index: usize) -> Vec3;

    /// Normal by index.
    fn normal(&self, index: usize) -> Vec3;

    /// Number of distinct textures the mesh uses.
    fn texture_count(&self) -> usize;

    /// Texture identifier by usage-list index.
    fn texture_used(&self, index: usize) -> i32;
}
