use crate::constants::{MAX_SUBDIVISION_LEVEL, SURFACE_BASE_COLOR, SURFACE_COLOR_JITTER};
use crate::error::{PlanetError, Result};
use crate::mesh::{SphereMesh, Vertex};
use glam::Vec3;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

/// Undirected mesh edge, stored with the smaller index first.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct Edge(pub u32, pub u32);

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn base_directions() -> [Vec3; 12] {
    let phi = (1.0 + 5.0_f32.sqrt()) * 0.5;
    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .map(Vec3::normalize)
}

/// Equirectangular texture coordinate of a unit direction.
pub fn sphere_uv(dir: Vec3) -> [f32; 2] {
    let u = 0.5 + dir.z.atan2(dir.x) / TAU;
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
    [u, v]
}

pub const fn expected_triangle_count(level: u32) -> usize {
    20 * 4usize.pow(level)
}

pub const fn expected_vertex_count(level: u32) -> usize {
    10 * 4usize.pow(level) + 2
}

/// Geodesic sphere built by recursive subdivision of an icosahedron.
#[derive(Debug, Clone, Copy)]
pub struct IcosphereBuilder {
    pub radius: f32,
    pub level: u32,
}

impl IcosphereBuilder {
    pub fn new(radius: f32, level: u32) -> Self {
        Self { radius, level }
    }

    /// Builds the mesh. Base vertex tints are drawn from `rng`, everything
    /// else is deterministic.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SphereMesh> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(PlanetError::InvalidRadius(self.radius));
        }
        if self.level > MAX_SUBDIVISION_LEVEL {
            return Err(PlanetError::SubdivisionTooDeep {
                requested: self.level,
                max: MAX_SUBDIVISION_LEVEL,
            });
        }

        let (mut vertices, mut indices) = self.base_icosahedron(rng);
        vertices.reserve(expected_vertex_count(self.level) - vertices.len());
        indices.reserve(expected_triangle_count(self.level) * 3 - indices.len());
        for _ in 0..self.level {
            subdivide(&mut vertices, &mut indices, self.radius);
        }

        if vertices.is_empty() || indices.is_empty() {
            return Err(PlanetError::EmptyMesh {
                vertices: vertices.len(),
                indices: indices.len(),
            });
        }

        log::debug!(
            "icosphere level {}: {} vertices, {} triangles",
            self.level,
            vertices.len(),
            indices.len() / 3
        );
        Ok(SphereMesh::from_parts(vertices, indices))
    }

    fn base_icosahedron<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<Vertex>, Vec<u32>) {
        let dirs = base_directions();
        let vertices = dirs
            .iter()
            .map(|&dir| {
                let mut color = [0.0, 0.0, 0.0, 1.0];
                for (c, base) in color.iter_mut().zip(SURFACE_BASE_COLOR) {
                    let jitter = rng.random_range(-SURFACE_COLOR_JITTER..=SURFACE_COLOR_JITTER);
                    *c = (base + jitter).clamp(0.0, 1.0);
                }
                Vertex::new(dir, self.radius, color, sphere_uv(dir))
            })
            .collect();

        // Not every face of the table is listed counter-clockwise; flip the
        // ones whose normal points inward.
        let indices = BASE_FACES
            .iter()
            .flat_map(|&[a, b, c]| {
                let (pa, pb, pc) = (dirs[a as usize], dirs[b as usize], dirs[c as usize]);
                let normal = (pb - pa).cross(pc - pa);
                if normal.dot(pa + pb + pc) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect();

        (vertices, indices)
    }
}

/// One 1→4 split of every triangle.
///
/// The parent triangle's slots are rewritten to its inner sub-triangle and
/// the three corner triangles are appended. Midpoints are shared through an
/// edge memo, so neighbouring triangles reference the same new vertex.
fn subdivide(vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>, radius: f32) {
    let triangle_count = indices.len() / 3;
    let mut midpoints: HashMap<Edge, u32> = HashMap::with_capacity(triangle_count * 3 / 2);

    for t in 0..triangle_count {
        let (a, b, c) = (indices[3 * t], indices[3 * t + 1], indices[3 * t + 2]);
        let ab = midpoint(vertices, &mut midpoints, a, b, radius);
        let bc = midpoint(vertices, &mut midpoints, b, c, radius);
        let ca = midpoint(vertices, &mut midpoints, c, a, radius);

        indices[3 * t] = ab;
        indices[3 * t + 1] = bc;
        indices[3 * t + 2] = ca;
        indices.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc]);
    }
}

fn midpoint(
    vertices: &mut Vec<Vertex>,
    midpoints: &mut HashMap<Edge, u32>,
    a: u32,
    b: u32,
    radius: f32,
) -> u32 {
    *midpoints.entry(Edge::new(a, b)).or_insert_with(|| {
        let mid = Vertex::lerp(&vertices[a as usize], &vertices[b as usize], 0.5, radius);
        vertices.push(mid);
        (vertices.len() - 1) as u32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RADIUS_EPSILON;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn build(radius: f32, level: u32) -> SphereMesh {
        let mut rng = StdRng::seed_from_u64(1);
        IcosphereBuilder::new(radius, level).build(&mut rng).unwrap()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    fn counts_follow_subdivision_level(#[case] level: u32) {
        let mesh = build(1.0, level);
        assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(level));
        assert_eq!(mesh.indices().len(), 60 * 4usize.pow(level));
        assert_eq!(mesh.vertex_count(), expected_vertex_count(level));
        assert!(mesh.vertex_count() >= 12);
    }

    #[rstest]
    #[case(1.0, 0)]
    #[case(1.0, 3)]
    #[case(6371.0, 2)]
    #[case(0.01, 3)]
    #[case(1e-25, 1)]
    #[case(1e19, 1)]
    fn every_vertex_lies_on_the_sphere(#[case] radius: f32, #[case] level: u32) {
        let mesh = build(radius, level);
        for v in mesh.vertices() {
            assert!(v.position().is_finite());
            // Scale back up before measuring so tiny radii do not underflow.
            let len = (v.position() / radius).length();
            assert!((len - 1.0).abs() <= RADIUS_EPSILON, "|p| / radius = {len}, radius = {radius}");
            assert_eq!(v.position[3], 1.0);
            assert!((v.normal().length() - 1.0).abs() < 1e-4);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    fn mesh_is_watertight(#[case] level: u32) {
        let mesh = build(1.0, level);
        let mut edge_use: HashMap<Edge, usize> = HashMap::new();
        for [a, b, c] in mesh.triangles() {
            for (x, y) in [(a, b), (b, c), (c, a)] {
                *edge_use.entry(Edge::new(x, y)).or_default() += 1;
            }
        }
        assert!(edge_use.values().all(|&n| n == 2));
        // Euler characteristic of a sphere.
        let v = mesh.vertex_count() as i64;
        let e = edge_use.len() as i64;
        let f = mesh.triangle_count() as i64;
        assert_eq!(v - e + f, 2);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn triangles_face_outward(#[case] level: u32) {
        let mesh = build(1.0, level);
        let vs = mesh.vertices();
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                vs[a as usize].position(),
                vs[b as usize].position(),
                vs[c as usize].position(),
            );
            let normal = (pb - pa).cross(pc - pa);
            assert!(normal.dot(pa + pb + pc) > 0.0);
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = build(2.0, 3);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices().iter().all(|&i| i < n));
        assert_eq!(mesh.indices().len() % 3, 0);
    }

    #[test]
    fn midpoint_attributes_are_interpolated() {
        let mesh = build(1.0, 1);
        let vs = mesh.vertices();
        // Corner triangles of base face 0 are appended after the 20 rewritten
        // slots: (a, ab, ca), then (b, bc, ab).
        let [a, ab, _] = mesh.triangles().nth(20).unwrap();
        let [b, _, _] = mesh.triangles().nth(21).unwrap();
        let expected = Vertex::lerp(&vs[a as usize], &vs[b as usize], 0.5, 1.0);
        assert_eq!(vs[ab as usize].color, expected.color);
        assert_eq!(vs[ab as usize].uv, expected.uv);
    }

    #[test]
    fn same_seed_same_mesh() {
        let a = build(1.0, 2);
        let b = build(1.0, 2);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.indices(), b.indices());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn rejects_bad_radius(#[case] radius: f32) {
        let mut rng = StdRng::seed_from_u64(1);
        let err = IcosphereBuilder::new(radius, 1).build(&mut rng).unwrap_err();
        assert!(matches!(err, PlanetError::InvalidRadius(_)));
    }

    #[test]
    fn rejects_excessive_level() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = IcosphereBuilder::new(1.0, MAX_SUBDIVISION_LEVEL + 1)
            .build(&mut rng)
            .unwrap_err();
        assert!(matches!(err, PlanetError::SubdivisionTooDeep { .. }));
    }

    #[test]
    fn edge_is_unordered() {
        assert_eq!(Edge::new(3, 7), Edge::new(7, 3));
        assert_eq!(Edge::new(7, 3), Edge(3, 7));
    }

    #[test]
    fn uv_stays_in_unit_square() {
        for dir in base_directions() {
            let [u, v] = sphere_uv(dir);
            assert!((0.0..=1.0).contains(&u));
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
