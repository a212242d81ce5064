//! Two-pass geometry batching
//!
//! The builder converts a face soup into four deduplicated vertex tables,
//! one shared triangle index buffer, and an ordered list of texture groups.
//! Pass 1 sizes everything: it counts triangles per layout variant (quads
//! count twice) and fixes the four index-buffer regions as prefix sums over
//! those counts. Pass 2 walks the faces once per texture group, decomposes
//! quads, resolves each corner through the variant's dedup table, and writes
//! the triangle indices at the variant's region cursor. Group ranges are
//! cursor snapshots taken after each group's scan, so ranges per variant are
//! contiguous and adjacent across groups.

use std::ops::Range;

use glam::{Vec2, Vec3};

use crate::batch::tables::VariantTables;
use crate::batch::vertex::{
    BasicVertex, NormalTexturedVertex, NormalVertex, TexturedVertex, VertexVariant, VARIANT_COUNT,
};
use crate::mesh::{Face, FaceAttributes, MeshSource, NO_TEXTURE};

/// Divisor applied to raw texture coordinates, which arrive in 0..255 texel
/// units.
pub const TEX_COORD_SCALE: f32 = 255.0;

/// The triangles of one texture assignment, as per-variant `[start, end)`
/// ranges (in triangles) into the shared index buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureGroup {
    /// Texture identifier, or [`NO_TEXTURE`] for the untextured bucket.
    pub texture: i32,
    /// Triangle range per vertex variant, indexed by variant.
    pub ranges: [Range<u32>; VARIANT_COUNT],
}

impl TextureGroup {
    /// The triangle range for one variant.
    pub fn range(&self, variant: VertexVariant) -> &Range<u32> {
        &self.ranges[variant.index()]
    }
}

/// Everything one build produces: dedup tables, the shared index buffer,
/// texture groups, and the pass-1 triangle counts per variant.
#[derive(Debug, Clone, Default)]
pub struct GeometryBatch {
    pub tables: VariantTables,
    pub indices: Vec<u16>,
    pub groups: Vec<TextureGroup>,
    /// Triangle count per variant, fixed in pass 1.
    pub triangles: [u32; VARIANT_COUNT],
}

impl GeometryBatch {
    /// Total triangle count across all variants.
    pub fn total_triangles(&self) -> u32 {
        self.triangles.iter().sum()
    }
}

/// Build a geometry batch from a mesh.
///
/// `reference` supplies vertex positions and defaults to `mesh`; passing a
/// different mesh reuses `mesh`'s topology against another's positions for
/// morph targets and animation frames. Normals always come from `mesh`.
/// An absent `mesh` yields an empty batch.
pub fn build_geometry(
    mesh: Option<&dyn MeshSource>,
    reference: Option<&dyn MeshSource>,
) -> GeometryBatch {
    let Some(mesh) = mesh else {
        return GeometryBatch::default();
    };
    let reference = reference.unwrap_or(mesh);

    // Pass 1: triangle counts per variant, untextured-bucket detection.
    let mut triangles = [0u32; VARIANT_COUNT];
    let mut has_untextured = false;
    for i in 0..mesh.face_count() {
        let face = mesh.face(i);
        let count = if face.attributes.contains(FaceAttributes::QUAD) {
            2
        } else {
            1
        };
        triangles[face.variant().index()] += count;
        if !face.is_textured() {
            has_untextured = true;
        }
    }
    let total: u32 = triangles.iter().sum();

    // Region starts are prefix sums over the per-variant counts. The cursors
    // start there and only ever advance within their region.
    let mut cursors = [0u32; VARIANT_COUNT];
    for v in 1..VARIANT_COUNT {
        cursors[v] = cursors[v - 1] + triangles[v - 1];
    }

    let mut indices = vec![0u16; total as usize * 3];
    let mut tables = VariantTables::default();

    // Group 0 is the untextured bucket when present; the rest follow the
    // mesh's texture-usage order.
    let group_count = mesh.texture_count() + has_untextured as usize;
    let mut groups = Vec::with_capacity(group_count);

    for g in 0..group_count {
        let texture = if !has_untextured {
            mesh.texture_used(g)
        } else if g == 0 {
            NO_TEXTURE
        } else {
            mesh.texture_used(g - 1)
        };

        let start = cursors;
        for f in 0..mesh.face_count() {
            let face = mesh.face(f);
            // A textured face whose id is absent from the usage list never
            // matches any group and is dropped without comment.
            if face.texture == texture {
                emit_face(&face, mesh, reference, &mut tables, &mut indices, &mut cursors);
            }
        }
        groups.push(TextureGroup {
            texture,
            ranges: std::array::from_fn(|v| start[v]..cursors[v]),
        });
    }

    GeometryBatch {
        tables,
        indices,
        groups,
        triangles,
    }
}

/// Decompose one face into triangles, resolving each corner through the
/// variant's dedup table and writing indices at the variant's cursor.
fn emit_face(
    face: &Face,
    mesh: &dyn MeshSource,
    reference: &dyn MeshSource,
    tables: &mut VariantTables,
    indices: &mut [u16],
    cursors: &mut [u32; VARIANT_COUNT],
) {
    let variant = face.variant();
    let corners = face.corner_count();

    let mut positions = [Vec3::ZERO; 4];
    for k in 0..corners {
        positions[k] = reference.vertex(face.vertices[k] as usize);
    }

    // Corner 0's color always comes from the face; the rest are copied when
    // per-vertex colors are present and broadcast from corner 0 otherwise.
    let mut colors = [face.colors[0]; 4];
    if face.attributes.contains(FaceAttributes::VERTEX_COLOR) {
        for k in 1..corners {
            colors[k] = face.colors[k];
        }
    }

    // Normals stay zeroed unless the face carries a face normal, even when
    // the per-vertex-normal bit is set on its own.
    let mut normals = [Vec3::ZERO; 4];
    if face.attributes.contains(FaceAttributes::NORMAL) {
        normals[0] = mesh.normal(face.normals[0] as usize);
        if face.attributes.contains(FaceAttributes::VERTEX_NORMAL) {
            for k in 1..corners {
                normals[k] = mesh.normal(face.normals[k] as usize);
            }
        } else {
            normals = [normals[0]; 4];
        }
    }

    let mut uvs = [Vec2::ZERO; 4];
    if face.is_textured() {
        for k in 0..corners {
            uvs[k] = face.tex_coords[k] / TEX_COORD_SCALE;
        }
    }

    let mut resolved = [0u16; 4];
    for k in 0..corners {
        let color = [colors[k][0], colors[k][1], colors[k][2], 255];
        resolved[k] = match variant {
            VertexVariant::Basic => tables.basic.resolve(BasicVertex {
                position: positions[k],
                color,
            }),
            VertexVariant::Normal => tables.normal.resolve(NormalVertex {
                position: positions[k],
                normal: normals[k],
                color,
            }),
            VertexVariant::Textured => tables.textured.resolve(TexturedVertex {
                position: positions[k],
                color,
                uv: uvs[k],
            }),
            VertexVariant::NormalTextured => tables.normal_textured.resolve(NormalTexturedVertex {
                position: positions[k],
                normal: normals[k],
                color,
                uv: uvs[k],
            }),
        };
    }

    // Quads split along the 0-2 diagonal: (0,1,2) then (0,2,3).
    let cursor = &mut cursors[variant.index()];
    let base = *cursor as usize * 3;
    indices[base] = resolved[0];
    indices[base + 1] = resolved[1];
    indices[base + 2] = resolved[2];
    *cursor += 1;
    if corners == 4 {
        let base = *cursor as usize * 3;
        indices[base] = resolved[0];
        indices[base + 1] = resolved[2];
        indices[base + 2] = resolved[3];
        *cursor += 1;
    }
}
