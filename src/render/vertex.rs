use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A single vertex: NDC position, RGBA color & texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], color: [f32; 4], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }

    /// Returns the vertex buffer layout
    ///
    /// Must match the vertex shader input:
    /// - location 0: `vec3<f32>` (position)
    /// - location 1: `vec4<f32>` (color)
    /// - location 2: `vec2<f32>` (texture coordinates)
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: 36,
            step_mode: VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
                VertexAttribute {
                    offset: 28,
                    shader_location: 2,
                    format: VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Three vertices forming a solid triangle, the unit of submission
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Triangle(pub [Vertex; 3]);

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self([a, b, c])
    }
}

/// Reinterprets triangles as their flat vertex list
pub(crate) fn vertices_of(triangles: &[Triangle]) -> &[Vertex] {
    bytemuck::cast_slice(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layout_matches_vertex_size() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride as usize, size_of::<Vertex>());
        assert_eq!(desc.attributes[0].offset as usize, 0);
        assert_eq!(
            desc.attributes[1].offset as usize,
            core::mem::offset_of!(Vertex, color)
        );
        assert_eq!(
            desc.attributes[2].offset as usize,
            core::mem::offset_of!(Vertex, tex_coords)
        );
    }

    #[test]
    fn triangles_flatten_in_order() {
        let v = |x: f32| Vertex::new([x, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0], [0.0, 0.0]);
        let tris = [
            Triangle::new(v(0.0), v(1.0), v(2.0)),
            Triangle::new(v(3.0), v(4.0), v(5.0)),
        ];

        let flat = vertices_of(&tris);
        assert_eq!(flat.len(), 6);
        assert_eq!(flat[4].position[0], 4.0);
    }
}
