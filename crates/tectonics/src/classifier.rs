use crate::error::{PlanetError, Result};
use crate::mesh::Vertex;
use crate::plate::{Plate, PlateId};
use glam::Vec3;
use rayon::prelude::*;

/// Owning plate of every mesh vertex.
///
/// This is the only record of plate membership; per-plate vertex sets are
/// filters over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexPlateMap {
    plate_of: Vec<PlateId>,
    plate_count: usize,
}

impl VertexPlateMap {
    pub fn plate_of(&self, vertex: usize) -> PlateId {
        self.plate_of[vertex]
    }

    pub fn as_slice(&self) -> &[PlateId] {
        &self.plate_of
    }

    pub fn len(&self) -> usize {
        self.plate_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plate_of.is_empty()
    }

    pub fn plate_count(&self) -> usize {
        self.plate_count
    }

    /// Vertex ids owned by `plate`, in ascending order.
    pub fn vertices_of(&self, plate: PlateId) -> impl Iterator<Item = usize> + '_ {
        self.plate_of
            .iter()
            .enumerate()
            .filter(move |&(_, &p)| p == plate)
            .map(|(v, _)| v)
    }

    /// Number of vertices owned by each plate, indexed by plate id.
    pub fn plate_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.plate_count];
        for &p in &self.plate_of {
            sizes[p] += 1;
        }
        sizes
    }
}

/// Index of the seed closest to `point`. The first strictly smaller distance
/// wins, so ties resolve to the lower plate id.
pub fn nearest_plate(point: Vec3, plates: &[Plate]) -> PlateId {
    let mut best_id = 0;
    let mut best_dist = f32::INFINITY;
    for (id, plate) in plates.iter().enumerate() {
        let dist = point.distance_squared(plate.seed);
        if dist < best_dist {
            best_dist = dist;
            best_id = id;
        }
    }
    best_id
}

/// Assigns every vertex to its nearest plate seed.
///
/// O(vertices × plates); runs once at setup, so no spatial index is kept.
pub fn classify(vertices: &[Vertex], plates: &[Plate]) -> Result<VertexPlateMap> {
    if plates.is_empty() {
        return Err(PlanetError::NoPlates);
    }
    let plate_of: Vec<PlateId> = vertices
        .par_iter()
        .map(|v| nearest_plate(v.position(), plates))
        .collect();

    let map = VertexPlateMap {
        plate_of,
        plate_count: plates.len(),
    };
    log::debug!(
        "classified {} vertices into {} plates, sizes {:?}",
        map.len(),
        plates.len(),
        map.plate_sizes()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TectonicsConfig;
    use crate::icosphere::IcosphereBuilder;
    use crate::seeder::PlateSeeder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use std::collections::HashSet;

    fn plate_at(id: PlateId, seed: Vec3) -> Plate {
        Plate::new(id, seed, Vec3::Y, 0.0, [1.0; 4])
    }

    fn setup(plates: usize, level: u32, seed: u64) -> (Vec<Vertex>, Vec<Plate>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mesh = IcosphereBuilder::new(1.0, level).build(&mut rng).unwrap();
        let plates = PlateSeeder::new(1.0, &TectonicsConfig::default()).seed_plates(plates, &mut rng);
        (mesh.vertices().to_vec(), plates)
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(8, 3)]
    #[case(30, 4)]
    fn every_vertex_owned_exactly_once(#[case] plate_count: usize, #[case] level: u32) {
        let (vertices, plates) = setup(plate_count, level, 17);
        let map = classify(&vertices, &plates).unwrap();
        assert_eq!(map.len(), vertices.len());

        let mut seen = HashSet::new();
        for p in 0..plate_count {
            for v in map.vertices_of(p) {
                assert!(seen.insert(v), "vertex {v} owned twice");
            }
        }
        assert_eq!(seen.len(), vertices.len());
        assert_eq!(map.plate_sizes().iter().sum::<usize>(), vertices.len());
    }

    #[test]
    fn picks_nearest_seed() {
        let plates = vec![plate_at(0, Vec3::X), plate_at(1, Vec3::NEG_X)];
        assert_eq!(nearest_plate(Vec3::new(0.9, 0.1, 0.0), &plates), 0);
        assert_eq!(nearest_plate(Vec3::new(-0.2, 0.9, 0.0), &plates), 1);
    }

    #[test]
    fn ties_go_to_lower_id() {
        let plates = vec![plate_at(0, Vec3::X), plate_at(1, Vec3::NEG_X)];
        assert_eq!(nearest_plate(Vec3::Y, &plates), 0);

        let swapped = vec![plate_at(0, Vec3::NEG_X), plate_at(1, Vec3::X)];
        assert_eq!(nearest_plate(Vec3::Y, &swapped), 0);
    }

    #[test]
    fn single_plate_owns_everything() {
        let (vertices, plates) = setup(1, 0, 4);
        let map = classify(&vertices, &plates).unwrap();
        assert!(map.as_slice().iter().all(|&p| p == 0));
        assert_eq!(map.vertices_of(0).count(), 12);
    }

    #[test]
    fn reclassification_is_idempotent() {
        let (vertices, plates) = setup(9, 3, 21);
        let first = classify(&vertices, &plates).unwrap();
        let second = classify(&vertices, &plates).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_plates_is_rejected() {
        let (vertices, _) = setup(1, 0, 0);
        assert!(matches!(classify(&vertices, &[]), Err(PlanetError::NoPlates)));
    }

    #[test]
    fn vertices_of_is_sorted() {
        let (vertices, plates) = setup(4, 2, 8);
        let map = classify(&vertices, &plates).unwrap();
        let owned: Vec<usize> = map.vertices_of(2).collect();
        assert!(owned.windows(2).all(|w| w[0] < w[1]));
    }
}
