use crate::error::{PlanetError, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// GPU-ready vertex. The position is homogeneous and always carries `w == 1`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Vertex at `direction * radius`. The normal is the unit direction
    /// itself, never recovered from the scaled position.
    pub fn new(direction: Vec3, radius: f32, color: [f32; 4], uv: [f32; 2]) -> Self {
        let normal = direction.normalize_or(Vec3::Y);
        Self {
            position: (normal * radius).extend(1.0).to_array(),
            normal: normal.to_array(),
            color,
            uv,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec4::from_array(self.position).truncate()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position.extend(1.0).to_array();
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    /// Interpolates color, uv and direction at `t`, then places the result
    /// on the sphere of `radius`. Directions are unit length, so tiny radii
    /// do not underflow.
    pub fn lerp(a: &Vertex, b: &Vertex, t: f32, radius: f32) -> Vertex {
        let direction = a.normal().lerp(b.normal(), t).normalize_or(a.normal());
        let color = Vec4::from_array(a.color)
            .lerp(Vec4::from_array(b.color), t)
            .to_array();
        let uv = glam::Vec2::from_array(a.uv)
            .lerp(glam::Vec2::from_array(b.uv), t)
            .to_array();
        Vertex::new(direction, radius, color, uv)
    }
}

/// Vertex and index arrays of a closed triangle mesh.
///
/// Indices are only ever written by the builder; afterwards the mesh hands
/// out read access and whole-array vertex replacement.
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl SphereMesh {
    pub(crate) fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(indices.len() % 3, 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Swaps in a new vertex array of the same length, returning the old one.
    pub fn replace_vertices(&mut self, vertices: Vec<Vertex>) -> Result<Vec<Vertex>> {
        if vertices.len() != self.vertices.len() {
            return Err(PlanetError::VertexCountMismatch {
                expected: self.vertices.len(),
                actual: vertices.len(),
            });
        }
        Ok(std::mem::replace(&mut self.vertices, vertices))
    }
}
