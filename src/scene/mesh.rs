use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex layout shared by the loader and the mesh pass
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Vertex color, white when the primitive has none
    pub color: [f32; 4],
}

impl MeshVertex {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // normal
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// One drawable piece of a mesh with a single material
#[derive(Debug, Clone)]
pub struct PrimitiveData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveData>,
}

/// Area-weighted vertex normals for primitives that ship without them
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size_matches_layout() {
        assert_eq!(MeshVertex::SIZE, 40);
        let layout = MeshVertex::buffer_layout();
        assert_eq!(layout.array_stride, 40);
        assert_eq!(layout.attributes.len(), 3);
    }

    #[test]
    fn test_normals_of_counter_clockwise_triangle() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = compute_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_up_normal() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let normals = compute_normals(&positions, &[0, 1, 2, 0, 1, 9]);
        assert_eq!(normals[3], Vec3::Y);
    }
}
