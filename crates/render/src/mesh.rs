use bytemuck::{Pod, Zeroable};

/// Vertex format for the cube demo: position + texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex format for the triangle demo: position + color + texture
/// coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FlatVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl FlatVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const fn v(x: f32, y: f32, z: f32, u: f32, w: f32) -> TexturedVertex {
    TexturedVertex {
        position: [x, y, z],
        uv: [u, w],
    }
}

/// Unit cube as 36 unindexed vertices: six faces, two triangles each.
#[rustfmt::skip]
pub const CUBE_VERTICES: [TexturedVertex; 36] = [
    // -Z face
    v(-0.5, -0.5, -0.5, 0.0, 0.0),
    v( 0.5, -0.5, -0.5, 1.0, 0.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v(-0.5,  0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 0.0),
    // +Z face
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 1.0),
    v( 0.5,  0.5,  0.5, 1.0, 1.0),
    v(-0.5,  0.5,  0.5, 0.0, 1.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    // -X face
    v(-0.5,  0.5,  0.5, 1.0, 0.0),
    v(-0.5,  0.5, -0.5, 1.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v(-0.5,  0.5,  0.5, 1.0, 0.0),
    // +X face
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5,  0.5, 0.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    // -Y face
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v( 0.5, -0.5, -0.5, 1.0, 1.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v(-0.5, -0.5,  0.5, 0.0, 0.0),
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    // +Y face
    v(-0.5,  0.5, -0.5, 0.0, 1.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v(-0.5,  0.5,  0.5, 0.0, 0.0),
    v(-0.5,  0.5, -0.5, 0.0, 1.0),
];

/// Triangle with one red, one green, and one blue corner.
#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [FlatVertex; 3] = [
    FlatVertex { position: [-0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0], uv: [0.0, 0.0] },
    FlatVertex { position: [ 0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0], uv: [1.0, 0.0] },
    FlatVertex { position: [ 0.0,  0.5, 0.0], color: [0.0, 0.0, 1.0], uv: [0.5, 1.0] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_36_vertices_within_unit_bounds() {
        assert_eq!(CUBE_VERTICES.len(), 36);
        for vertex in &CUBE_VERTICES {
            for coord in vertex.position {
                assert!(coord.abs() <= 0.5);
            }
            for uv in vertex.uv {
                assert!((0.0..=1.0).contains(&uv));
            }
        }
    }

    #[test]
    fn cube_covers_all_six_faces() {
        // Each face contributes 6 vertices pinned to one axis at +-0.5.
        for (axis, sign) in [(0, -1.0), (0, 1.0), (1, -1.0), (1, 1.0), (2, -1.0), (2, 1.0)] {
            let count = CUBE_VERTICES
                .iter()
                .filter(|v| v.position[axis] == 0.5 * sign)
                .count();
            assert!(count >= 6, "face {axis}/{sign} underpopulated: {count}");
        }
    }

    #[test]
    fn triangle_corners_carry_primary_colors() {
        assert_eq!(TRIANGLE_VERTICES.len(), 3);
        let colors: Vec<[f32; 3]> = TRIANGLE_VERTICES.iter().map(|v| v.color).collect();
        assert!(colors.contains(&[1.0, 0.0, 0.0]));
        assert!(colors.contains(&[0.0, 1.0, 0.0]));
        assert!(colors.contains(&[0.0, 0.0, 1.0]));
    }

    #[test]
    fn vertex_strides_match_layouts() {
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 20);
        assert_eq!(std::mem::size_of::<FlatVertex>(), 32);
        assert_eq!(TexturedVertex::layout().array_stride, 20);
        assert_eq!(FlatVertex::layout().array_stride, 32);
    }

    #[test]
    fn attribute_offsets_are_interleaved() {
        let textured = TexturedVertex::layout();
        assert_eq!(textured.attributes[0].offset, 0);
        assert_eq!(textured.attributes[1].offset, 12);

        let flat = FlatVertex::layout();
        assert_eq!(flat.attributes[0].offset, 0);
        assert_eq!(flat.attributes[1].offset, 12);
        assert_eq!(flat.attributes[2].offset, 24);
    }
}
