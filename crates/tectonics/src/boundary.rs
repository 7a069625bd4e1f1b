//! Plate boundaries and the plate adjacency graph.
//!
//! Everything here is derived from the triangle index array and the
//! vertex→plate map; nothing is read from vertex positions except the
//! boundary-type classification, which samples plate velocities at edge
//! midpoints.

use crate::classifier::VertexPlateMap;
use crate::config::{AdjacencyRule, LaplacianSign};
use crate::icosphere::Edge;
use crate::mesh::SphereMesh;
use crate::plate::{Plate, PlateId};
use glam::Vec3;
use std::collections::HashSet;

/// Fraction of the relative speed the across-boundary component must reach
/// before a boundary counts as converging or diverging.
const TRANSFORM_RATIO: f32 = 0.3;

/// Type of plate boundary interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// Plates closing on each other (red)
    Convergent,
    /// Plates spreading apart (blue)
    Divergent,
    /// Plates sliding past each other (yellow)
    Transform,
}

impl BoundaryType {
    pub fn color(&self) -> [f32; 4] {
        match self {
            BoundaryType::Convergent => [1.0, 0.0, 0.0, 1.0],
            BoundaryType::Divergent => [0.0, 0.5, 1.0, 1.0],
            BoundaryType::Transform => [1.0, 1.0, 0.0, 1.0],
        }
    }

    /// Convergent wins over divergent, divergent over transform.
    fn priority(self) -> u8 {
        match self {
            BoundaryType::Convergent => 2,
            BoundaryType::Divergent => 1,
            BoundaryType::Transform => 0,
        }
    }
}

/// A mesh edge whose endpoints belong to different plates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEdge {
    pub edge: Edge,
    /// The two plates, lower id first.
    pub plates: (PlateId, PlateId),
    pub kind: BoundaryType,
}

/// Binary plate adjacency with its degree vector and combined matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateGraph {
    adjacency: Vec<Vec<u8>>,
    degree: Vec<u32>,
    laplacian: Vec<Vec<i32>>,
    sign: LaplacianSign,
}

impl PlateGraph {
    fn empty(plate_count: usize, sign: LaplacianSign) -> Self {
        Self {
            adjacency: vec![vec![0; plate_count]; plate_count],
            degree: vec![0; plate_count],
            laplacian: vec![vec![0; plate_count]; plate_count],
            sign,
        }
    }

    fn connect(&mut self, a: PlateId, b: PlateId) {
        if a != b {
            self.adjacency[a][b] = 1;
            self.adjacency[b][a] = 1;
        }
    }

    fn finish(&mut self) {
        let s = self.sign.factor();
        for (i, row) in self.adjacency.iter().enumerate() {
            self.degree[i] = row.iter().map(|&a| a as u32).sum();
            for (j, &a) in row.iter().enumerate() {
                let d = if i == j { self.degree[i] as i32 } else { 0 };
                self.laplacian[i][j] = d + s * a as i32;
            }
        }
    }

    pub fn plate_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn adjacency(&self) -> &[Vec<u8>] {
        &self.adjacency
    }

    pub fn degree(&self) -> &[u32] {
        &self.degree
    }

    /// `degree ± adjacency`, depending on the configured [`LaplacianSign`].
    pub fn laplacian(&self) -> &[Vec<i32>] {
        &self.laplacian
    }

    pub fn sign(&self) -> LaplacianSign {
        self.sign
    }

    pub fn is_adjacent(&self, a: PlateId, b: PlateId) -> bool {
        self.adjacency[a][b] != 0
    }

    pub fn neighbors(&self, plate: PlateId) -> impl Iterator<Item = PlateId> + '_ {
        self.adjacency[plate]
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a != 0)
            .map(|(j, _)| j)
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.plate_count();
        (0..n).all(|i| self.adjacency[i][i] == 0 && (0..n).all(|j| self.adjacency[i][j] == self.adjacency[j][i]))
    }
}

/// Output of [`BoundaryGraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct PlateBoundaries {
    boundary: Vec<bool>,
    vertex_kind: Vec<Option<BoundaryType>>,
    edges: Vec<BoundaryEdge>,
    graph: PlateGraph,
}

impl PlateBoundaries {
    pub fn is_boundary(&self, vertex: usize) -> bool {
        self.boundary[vertex]
    }

    pub fn boundary_flags(&self) -> &[bool] {
        &self.boundary
    }

    pub fn boundary_vertex_count(&self) -> usize {
        self.boundary.iter().filter(|&&b| b).count()
    }

    /// Boundary vertices owned by `plate`, derived from the plate map.
    pub fn boundary_vertices_of<'a>(
        &'a self,
        map: &'a VertexPlateMap,
        plate: PlateId,
    ) -> impl Iterator<Item = usize> + 'a {
        map.vertices_of(plate).filter(move |&v| self.boundary[v])
    }

    /// Strongest interaction type among the boundary edges touching `vertex`.
    pub fn vertex_kind(&self, vertex: usize) -> Option<BoundaryType> {
        self.vertex_kind[vertex]
    }

    pub fn edges(&self) -> &[BoundaryEdge] {
        &self.edges
    }

    pub fn incident_edges(&self, plate: PlateId) -> impl Iterator<Item = &BoundaryEdge> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.plates.0 == plate || e.plates.1 == plate)
    }

    /// Plates × boundary edges, 1 where the plate lies on either side of the edge.
    pub fn incidence_matrix(&self) -> Vec<Vec<u8>> {
        let mut incidence = vec![vec![0u8; self.edges.len()]; self.graph.plate_count()];
        for (k, e) in self.edges.iter().enumerate() {
            incidence[e.plates.0][k] = 1;
            incidence[e.plates.1][k] = 1;
        }
        incidence
    }

    pub fn graph(&self) -> &PlateGraph {
        &self.graph
    }
}

/// Walks the triangle list once to mark boundary vertices and build the
/// plate adjacency graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryGraphBuilder {
    pub sign: LaplacianSign,
    pub rule: AdjacencyRule,
}

impl BoundaryGraphBuilder {
    pub fn new(sign: LaplacianSign, rule: AdjacencyRule) -> Self {
        Self { sign, rule }
    }

    pub fn build(&self, mesh: &SphereMesh, map: &VertexPlateMap, plates: &[Plate]) -> PlateBoundaries {
        let mut boundary = vec![false; mesh.vertex_count()];
        let mut graph = PlateGraph::empty(plates.len(), self.sign);
        let mut seen_edges: HashSet<Edge> = HashSet::new();
        let mut edges = Vec::new();

        for [i, j, k] in mesh.triangles() {
            let corners = [i as usize, j as usize, k as usize];
            let [pi, pj, pk] = corners.map(|v| map.plate_of(v));
            if pi == pj && pj == pk {
                continue;
            }

            // All three corners are marked, even one that agrees with a neighbour.
            for v in corners {
                boundary[v] = true;
            }

            let all_distinct = pi != pj && pj != pk && pi != pk;
            if all_distinct || self.rule == AdjacencyRule::AnyStraddle {
                graph.connect(pi, pj);
                graph.connect(pj, pk);
                graph.connect(pi, pk);
            }

            for (a, b) in [(i, j), (j, k), (k, i)] {
                let (pa, pb) = (map.plate_of(a as usize), map.plate_of(b as usize));
                if pa != pb && seen_edges.insert(Edge::new(a, b)) {
                    let kind = classify_edge(mesh, a, b, &plates[pa], &plates[pb]);
                    edges.push(BoundaryEdge {
                        edge: Edge::new(a, b),
                        plates: (pa.min(pb), pa.max(pb)),
                        kind,
                    });
                }
            }
        }
        graph.finish();

        let mut vertex_kind: Vec<Option<BoundaryType>> = vec![None; mesh.vertex_count()];
        for e in &edges {
            for v in [e.edge.0 as usize, e.edge.1 as usize] {
                let stronger = match vertex_kind[v] {
                    Some(current) => e.kind.priority() > current.priority(),
                    None => true,
                };
                if stronger {
                    vertex_kind[v] = Some(e.kind);
                }
            }
        }

        let result = PlateBoundaries {
            boundary,
            vertex_kind,
            edges,
            graph,
        };
        log::debug!(
            "plate boundaries: {} boundary vertices, {} boundary edges, degrees {:?}",
            result.boundary_vertex_count(),
            result.edges.len(),
            result.graph.degree()
        );
        result
    }
}

fn classify_edge(mesh: &SphereMesh, a: u32, b: u32, plate_a: &Plate, plate_b: &Plate) -> BoundaryType {
    let vs = mesh.vertices();
    let mid = (vs[a as usize].normal() + vs[b as usize].normal()).normalize_or_zero();
    classify_boundary(mid, plate_a, plate_b)
}

/// Classify the interaction of two plates at a unit-sphere point on their boundary.
///
/// The relative surface velocity is split into the component across the
/// boundary (along the tangent direction from plate A's seed towards plate
/// B's) and the remainder. A dominant positive across-component means A is
/// closing on B.
pub fn classify_boundary(position: Vec3, plate_a: &Plate, plate_b: &Plate) -> BoundaryType {
    let center_line = (plate_b.seed.normalize_or_zero() - plate_a.seed.normalize_or_zero()).normalize_or_zero();
    if center_line == Vec3::ZERO || position == Vec3::ZERO {
        return BoundaryType::Transform;
    }

    let across = (center_line - position * center_line.dot(position)).normalize_or_zero();
    if across == Vec3::ZERO {
        return BoundaryType::Transform;
    }

    let relative_vel = plate_a.surface_velocity(position) - plate_b.surface_velocity(position);
    let rel_speed = relative_vel.length();
    if rel_speed < 1e-9 {
        return BoundaryType::Transform;
    }

    let closing = relative_vel.dot(across);
    let threshold = rel_speed * TRANSFORM_RATIO;
    if closing > threshold {
        BoundaryType::Convergent
    } else if closing < -threshold {
        BoundaryType::Divergent
    } else {
        BoundaryType::Transform
    }
}
