use crate::constants::UNCLASSIFIED_BOUNDARY_COLOR;
use crate::mesh::Vertex;
use crate::planet::Planet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Plates,
    Surface,
    Boundaries,
}

impl ViewMode {
    pub fn next(self) -> Self {
        match self {
            ViewMode::Plates => ViewMode::Boundaries,
            ViewMode::Boundaries => ViewMode::Surface,
            ViewMode::Surface => ViewMode::Plates,
        }
    }
}

/// How strongly the boundary type color replaces the plate color in the boundary view.
const BOUNDARY_OPACITY: f32 = 0.8;
/// Interior vertices are dimmed in the boundary view so the seams stand out.
const INTERIOR_DIM: f32 = 0.35;

/// Raw mesh data that can be used by any rendering engine
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Splits interleaved vertices into per-attribute arrays, keeping vertex colors.
    pub fn from_vertices(vertices: &[Vertex], indices: &[u32]) -> Self {
        let (positions, normals) = positions_and_normals(vertices);
        Self {
            positions,
            normals,
            colors: vertices.iter().map(|v| v.color).collect(),
            uvs: vertices.iter().map(|v| v.uv).collect(),
            indices: indices.to_vec(),
        }
    }

    /// Generate mesh data from a planet, colored for `view_mode`.
    pub fn from_planet(planet: &Planet, view_mode: ViewMode) -> Self {
        let mut data = Self::from_vertices(planet.mesh().vertices(), planet.mesh().indices());
        data.colors = vertex_colors(planet, view_mode);
        data
    }
}

/// Positions with the homogeneous coordinate dropped, plus normals.
pub fn positions_and_normals(vertices: &[Vertex]) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    vertices
        .iter()
        .map(|v| ([v.position[0], v.position[1], v.position[2]], v.normal))
        .unzip()
}

pub fn vertex_colors(planet: &Planet, view_mode: ViewMode) -> Vec<[f32; 4]> {
    let vertices = planet.mesh().vertices();
    match view_mode {
        ViewMode::Surface => vertices.iter().map(|v| v.color).collect(),
        ViewMode::Plates => (0..vertices.len()).map(|i| plate_color(planet, i)).collect(),
        ViewMode::Boundaries => (0..vertices.len())
            .map(|i| boundary_view_color(planet, i))
            .collect(),
    }
}

fn plate_color(planet: &Planet, vertex: usize) -> [f32; 4] {
    planet.plates()[planet.plate_map().plate_of(vertex)].color
}

fn boundary_view_color(planet: &Planet, vertex: usize) -> [f32; 4] {
    let mut base = plate_color(planet, vertex);
    if !planet.boundaries().is_boundary(vertex) {
        for c in &mut base[..3] {
            *c *= INTERIOR_DIM;
        }
        return base;
    }

    let tint = planet
        .boundaries()
        .vertex_kind(vertex)
        .map(|kind| kind.color())
        .unwrap_or(UNCLASSIFIED_BOUNDARY_COLOR);
    for (c, t) in base[..3].iter_mut().zip(tint) {
        *c = *c * (1.0 - BOUNDARY_OPACITY) + t * BOUNDARY_OPACITY;
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TectonicsConfig;
    use crate::planet::PlanetSettings;
    use rstest::rstest;

    fn planet() -> Planet {
        Planet::generate(PlanetSettings::new(5, 2.0, 2).with_seed(10), &TectonicsConfig::default()).unwrap()
    }

    #[rstest]
    #[case(ViewMode::Plates)]
    #[case(ViewMode::Surface)]
    #[case(ViewMode::Boundaries)]
    fn arrays_line_up(#[case] mode: ViewMode) {
        let planet = planet();
        let data = MeshData::from_planet(&planet, mode);
        let n = planet.mesh().vertex_count();
        assert_eq!(data.positions.len(), n);
        assert_eq!(data.normals.len(), n);
        assert_eq!(data.colors.len(), n);
        assert_eq!(data.uvs.len(), n);
        assert_eq!(data.indices, planet.mesh().indices());
    }

    #[test]
    fn plate_view_uses_plate_colors() {
        let planet = planet();
        let colors = vertex_colors(&planet, ViewMode::Plates);
        for (i, color) in colors.iter().enumerate() {
            let plate = planet.plate_map().plate_of(i);
            assert_eq!(*color, planet.plates()[plate].color);
        }
    }

    #[test]
    fn boundary_view_tints_only_boundary_vertices() {
        let planet = planet();
        let colors = vertex_colors(&planet, ViewMode::Boundaries);
        for (i, color) in colors.iter().enumerate() {
            let plate = planet.plates()[planet.plate_map().plate_of(i)].color;
            if planet.boundaries().is_boundary(i) {
                assert_ne!(*color, plate);
            } else {
                assert!((color[0] - plate[0] * INTERIOR_DIM).abs() < 1e-6);
            }
            assert_eq!(color[3], 1.0);
        }
    }

    #[test]
    fn positions_drop_w() {
        let planet = planet();
        let (positions, normals) = positions_and_normals(planet.mesh().vertices());
        for ((p, n), v) in positions.iter().zip(&normals).zip(planet.mesh().vertices()) {
            assert_eq!(p[..], v.position[..3]);
            assert_eq!(*n, v.normal);
        }
    }

    #[test]
    fn view_modes_cycle() {
        let mut mode = ViewMode::default();
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::Plates);
    }
}
