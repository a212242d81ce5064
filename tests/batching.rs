//! Builder properties: sizing, dedup, decomposition, and group partitioning.

use glam::{Vec2, Vec3};
use meshbatch::batch::{build_geometry, VertexVariant};
use meshbatch::mesh::{Face, FaceAttributes, MeshSource, NO_TEXTURE};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestMesh {
    faces: Vec<Face>,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    textures: Vec<i32>,
}

impl MeshSource for TestMesh {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, index: usize) -> Face {
        self.faces[index]
    }

    fn vertex(&self, index: usize) -> Vec3 {
        self.vertices[index]
    }

    fn normal(&self, index: usize) -> Vec3 {
        self.normals[index]
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn texture_used(&self, index: usize) -> i32 {
        self.textures[index]
    }
}

fn triangle(vertices: [u32; 3]) -> Face {
    Face {
        vertices: [vertices[0], vertices[1], vertices[2], 0],
        colors: [[200, 200, 200]; 4],
        ..Face::default()
    }
}

fn quad(vertices: [u32; 4]) -> Face {
    Face {
        attributes: FaceAttributes::QUAD,
        vertices,
        colors: [[200, 200, 200]; 4],
        ..Face::default()
    }
}

fn grid_vertices(count: usize) -> Vec<Vec3> {
    (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
}

// ---------------------------------------------------------------------------
// Empty and absent meshes
// ---------------------------------------------------------------------------

#[test]
fn absent_mesh_yields_an_empty_batch() {
    let batch = build_geometry(None, None);
    assert!(batch.groups.is_empty());
    assert!(batch.indices.is_empty());
    assert_eq!(batch.total_triangles(), 0);
}

#[test]
fn zero_faces_yield_zero_groups_and_empty_tables() {
    let mesh = TestMesh::default();
    let batch = build_geometry(Some(&mesh), None);
    assert!(batch.groups.is_empty());
    assert!(batch.indices.is_empty());
    for variant in VertexVariant::ALL {
        assert!(batch.tables.is_empty(variant));
    }
}

// ---------------------------------------------------------------------------
// The two-face scenario: one untextured triangle, one textured lit quad
// ---------------------------------------------------------------------------

#[test]
fn untextured_triangle_and_textured_quad_partition_into_two_groups() {
    let mut quad_face = quad([3, 4, 5, 6]);
    quad_face.attributes |= FaceAttributes::NORMAL | FaceAttributes::TEXTURED;
    quad_face.texture = 5;
    quad_face.tex_coords = [
        Vec2::new(0.0, 0.0),
        Vec2::new(255.0, 0.0),
        Vec2::new(255.0, 255.0),
        Vec2::new(0.0, 255.0),
    ];

    let mesh = TestMesh {
        faces: vec![triangle([0, 1, 2]), quad_face],
        vertices: grid_vertices(7),
        normals: vec![Vec3::Y],
        textures: vec![5],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.groups.len(), 2);

    let untextured = &batch.groups[0];
    assert_eq!(untextured.texture, NO_TEXTURE);
    assert_eq!(untextured.range(VertexVariant::Basic).len(), 1);
    assert_eq!(untextured.range(VertexVariant::NormalTextured).len(), 0);

    let textured = &batch.groups[1];
    assert_eq!(textured.texture, 5);
    assert_eq!(textured.range(VertexVariant::NormalTextured).len(), 2);
    assert_eq!(textured.range(VertexVariant::Basic).len(), 0);

    // Four distinct quad corners, none bit-identical.
    assert_eq!(batch.tables.len(VertexVariant::NormalTextured), 4);
    assert_eq!(batch.tables.len(VertexVariant::Basic), 3);
}

// ---------------------------------------------------------------------------
// Sizing invariant
// ---------------------------------------------------------------------------

#[test]
fn group_ranges_cover_exactly_the_pass_one_counts() {
    let mut faces = vec![
        triangle([0, 1, 2]),
        quad([0, 1, 2, 3]),
        triangle([2, 3, 4]),
    ];
    let mut lit = triangle([1, 3, 5]);
    lit.attributes |= FaceAttributes::NORMAL;
    faces.push(lit);
    for texture in [7, 9] {
        let mut face = quad([0, 2, 4, 6]);
        face.attributes |= FaceAttributes::TEXTURED;
        face.texture = texture;
        faces.push(face);
    }

    let mesh = TestMesh {
        faces,
        vertices: grid_vertices(8),
        normals: vec![Vec3::Y],
        textures: vec![7, 9],
    };

    // Independent per-variant triangle counts: quads count twice.
    let mut expected = [0u32; 4];
    for face in &mesh.faces {
        let count = if face.attributes.contains(FaceAttributes::QUAD) {
            2
        } else {
            1
        };
        expected[face.variant().index()] += count;
    }

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.triangles, expected);
    assert_eq!(batch.indices.len() as u32, batch.total_triangles() * 3);

    for variant in VertexVariant::ALL {
        let covered: u32 = batch
            .groups
            .iter()
            .map(|g| g.range(variant).len() as u32)
            .sum();
        assert_eq!(covered, expected[variant.index()], "variant {variant:?}");
    }
}

#[test]
fn group_ranges_per_variant_are_adjacent() {
    // Faces spread over the untextured bucket and two textures; every
    // variant's ranges must tile its region without gaps.
    let mut faces = vec![triangle([0, 1, 2])];
    for texture in [3, 8] {
        let mut face = triangle([0, 1, 2]);
        face.attributes |= FaceAttributes::TEXTURED;
        face.texture = texture;
        face.tex_coords = [Vec2::new(texture as f32, 0.0); 4];
        faces.push(face);
    }
    let mesh = TestMesh {
        faces,
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![3, 8],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.groups.len(), 3);
    assert_eq!(batch.groups[0].range(VertexVariant::Basic).clone(), 0..1);
    for pair in batch.groups.windows(2) {
        for variant in VertexVariant::ALL {
            assert_eq!(
                pair[0].range(variant).end,
                pair[1].range(variant).start,
                "groups must be adjacent per variant"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[test]
fn shared_edge_vertices_resolve_to_shared_indices() {
    // Two triangles sharing the 1-2 edge with identical colors.
    let mesh = TestMesh {
        faces: vec![triangle([0, 1, 2]), triangle([1, 3, 2])],
        vertices: grid_vertices(4),
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.tables.len(VertexVariant::Basic), 4);
    assert_eq!(batch.indices.len(), 6);
    // Triangle 0 is (0,1,2); triangle 1 reuses the records for mesh
    // vertices 1 and 2.
    assert_eq!(batch.indices[0..3], [0, 1, 2]);
    assert_eq!(batch.indices[3], 1);
    assert_eq!(batch.indices[5], 2);
}

#[test]
fn differing_colors_defeat_position_sharing() {
    let mut second = triangle([1, 3, 2]);
    second.colors = [[9, 9, 9]; 4];
    let mesh = TestMesh {
        faces: vec![triangle([0, 1, 2]), second],
        vertices: grid_vertices(4),
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    // No record is bit-identical across the two faces.
    assert_eq!(batch.tables.len(VertexVariant::Basic), 6);
}

#[test]
fn table_never_exceeds_processed_vertex_instances() {
    let mesh = TestMesh {
        faces: vec![
            triangle([0, 1, 2]),
            triangle([0, 1, 2]),
            quad([0, 1, 2, 3]),
        ],
        vertices: grid_vertices(4),
        normals: vec![],
        textures: vec![],
    };
    let batch = build_geometry(Some(&mesh), None);
    // 3 + 3 + 4 instances collapse to the 4 distinct records.
    assert_eq!(batch.tables.len(VertexVariant::Basic), 4);
}

// ---------------------------------------------------------------------------
// Quad decomposition
// ---------------------------------------------------------------------------

#[test]
fn quad_splits_along_the_zero_two_diagonal() {
    let mesh = TestMesh {
        faces: vec![quad([0, 1, 2, 3])],
        vertices: grid_vertices(4),
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.indices.len(), 6);
    let (a, b, c) = (batch.indices[0], batch.indices[1], batch.indices[2]);
    let (a2, c2, d) = (batch.indices[3], batch.indices[4], batch.indices[5]);
    // (A,B,C) then (A,C,D), sharing resolved A and C.
    assert_eq!(a, a2);
    assert_eq!(c, c2);
    assert_eq!([a, b, c, d], [0, 1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Group partitioning
// ---------------------------------------------------------------------------

#[test]
fn groups_contain_only_their_texture_faces() {
    let mut textured7 = triangle([0, 1, 2]);
    textured7.attributes |= FaceAttributes::TEXTURED;
    textured7.texture = 7;
    textured7.tex_coords = [Vec2::new(7.0, 0.0); 4];

    let mut textured9 = triangle([3, 4, 5]);
    textured9.attributes |= FaceAttributes::TEXTURED;
    textured9.texture = 9;
    textured9.tex_coords = [Vec2::new(9.0, 0.0); 4];

    let mesh = TestMesh {
        faces: vec![textured7, triangle([6, 7, 8]), textured9],
        vertices: grid_vertices(9),
        normals: vec![],
        textures: vec![7, 9],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.groups.len(), 3);
    assert_eq!(batch.groups[0].texture, NO_TEXTURE);
    assert_eq!(batch.groups[1].texture, 7);
    assert_eq!(batch.groups[2].texture, 9);

    // Resolve each textured group's triangles back to positions and check
    // they come from the right face.
    let records = batch.tables.textured.records();
    for (group, base_vertex) in [(&batch.groups[1], 0.0), (&batch.groups[2], 3.0)] {
        let range = group.range(VertexVariant::Textured);
        assert_eq!(range.len(), 1);
        let start = range.start as usize * 3;
        for offset in 0..3 {
            let record = records[batch.indices[start + offset] as usize];
            assert_eq!(record.position.x, base_vertex + offset as f32);
        }
    }
}

#[test]
fn face_with_unlisted_texture_is_silently_dropped() {
    let mut stray = triangle([0, 1, 2]);
    stray.attributes |= FaceAttributes::TEXTURED;
    stray.texture = 42; // not in the usage list

    let mesh = TestMesh {
        faces: vec![stray, triangle([0, 1, 2])],
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![7],
    };

    let batch = build_geometry(Some(&mesh), None);
    // The untextured bucket and the listed texture's (empty) group.
    assert_eq!(batch.groups.len(), 2);
    for group in &batch.groups {
        assert_eq!(group.range(VertexVariant::Textured).len(), 0);
    }
    assert!(batch.tables.is_empty(VertexVariant::Textured));
}

#[test]
fn fully_textured_mesh_has_no_untextured_bucket() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::TEXTURED;
    face.texture = 11;

    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![11],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.groups.len(), 1);
    assert_eq!(batch.groups[0].texture, 11);
}

// ---------------------------------------------------------------------------
// Record synthesis rules
// ---------------------------------------------------------------------------

#[test]
fn texture_coordinates_are_scaled_from_texel_units() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::TEXTURED;
    face.texture = 1;
    face.tex_coords = [
        Vec2::new(255.0, 0.0),
        Vec2::new(127.5, 255.0),
        Vec2::new(0.0, 51.0),
        Vec2::ZERO,
    ];

    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![1],
    };

    let batch = build_geometry(Some(&mesh), None);
    let records = batch.tables.textured.records();
    assert_eq!(records[0].uv, Vec2::new(1.0, 0.0));
    assert_eq!(records[1].uv, Vec2::new(0.5, 1.0));
    assert_eq!(records[2].uv, Vec2::new(0.0, 0.2));
}

#[test]
fn face_color_broadcasts_to_all_corners() {
    let mut face = triangle([0, 1, 2]);
    face.colors = [[10, 20, 30], [1, 1, 1], [2, 2, 2], [3, 3, 3]];
    // Without VERTEX_COLOR only corner 0's color counts.
    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    for record in batch.tables.basic.records() {
        assert_eq!(record.color, [10, 20, 30, 255]);
    }
}

#[test]
fn per_vertex_colors_are_kept_distinct() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::VERTEX_COLOR;
    face.colors = [[10, 0, 0], [0, 20, 0], [0, 0, 30], [0, 0, 0]];
    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    let records = batch.tables.basic.records();
    assert_eq!(records[0].color, [10, 0, 0, 255]);
    assert_eq!(records[1].color, [0, 20, 0, 255]);
    assert_eq!(records[2].color, [0, 0, 30, 255]);
}

#[test]
fn face_normal_broadcasts_to_all_corners() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::NORMAL;
    face.normals = [2, 0, 0, 0];
    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![Vec3::X, Vec3::Y, Vec3::Z],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    for record in batch.tables.normal.records() {
        assert_eq!(record.normal, Vec3::Z);
    }
}

#[test]
fn per_vertex_normals_are_read_individually() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::NORMAL | FaceAttributes::VERTEX_NORMAL;
    face.normals = [0, 1, 2, 0];
    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![Vec3::X, Vec3::Y, Vec3::Z],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    let records = batch.tables.normal.records();
    assert_eq!(records[0].normal, Vec3::X);
    assert_eq!(records[1].normal, Vec3::Y);
    assert_eq!(records[2].normal, Vec3::Z);
}

#[test]
fn vertex_normal_without_face_normal_emits_zero_normals() {
    // The per-vertex bit alone selects a normal-bearing layout but the
    // normal data is never read.
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::VERTEX_NORMAL;
    face.normals = [0, 1, 2, 0];
    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![Vec3::X, Vec3::Y, Vec3::Z],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), None);
    assert_eq!(batch.tables.len(VertexVariant::Normal), 3);
    for record in batch.tables.normal.records() {
        assert_eq!(record.normal, Vec3::ZERO);
    }
}

// ---------------------------------------------------------------------------
// Reference mesh (morph) positions
// ---------------------------------------------------------------------------

#[test]
fn reference_mesh_supplies_positions_while_mesh_supplies_the_rest() {
    let mut face = triangle([0, 1, 2]);
    face.attributes |= FaceAttributes::NORMAL;
    face.normals = [0, 0, 0, 0];

    let mesh = TestMesh {
        faces: vec![face],
        vertices: grid_vertices(3),
        normals: vec![Vec3::Y],
        textures: vec![],
    };
    let morphed = TestMesh {
        faces: vec![],
        vertices: vec![
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::new(2.0, 5.0, 0.0),
        ],
        normals: vec![],
        textures: vec![],
    };

    let batch = build_geometry(Some(&mesh), Some(&morphed));
    let records = batch.tables.normal.records();
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.position, Vec3::new(i as f32, 5.0, 0.0));
        assert_eq!(record.normal, Vec3::Y);
    }
}
