use crate::boundary::{BoundaryGraphBuilder, PlateBoundaries};
use crate::classifier::{VertexPlateMap, classify};
use crate::config::TectonicsConfig;
use crate::error::{PlanetError, Result};
use crate::icosphere::IcosphereBuilder;
use crate::kinematics::PlateKinematics;
use crate::mesh::SphereMesh;
use crate::plate::{Plate, PlateId};
use crate::seeder::PlateSeeder;
use crate::upload::{FrameTimer, MeshUpload};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetSettings {
    pub plate_count: usize,
    pub radius: f32,
    pub subdivision_level: u32,
    pub seed: u64,
}

impl PlanetSettings {
    pub fn new(plate_count: usize, radius: f32, subdivision_level: u32) -> Self {
        Self {
            plate_count,
            radius,
            subdivision_level,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl From<&TectonicsConfig> for PlanetSettings {
    fn from(config: &TectonicsConfig) -> Self {
        Self::new(
            config.generation.default_num_plates,
            config.generation.default_radius,
            config.generation.default_subdivision_level,
        )
    }
}

/// An icosphere partitioned into rigid plates.
///
/// The planet is the only owner of its mesh, plates and boundary graph, and
/// [`PlateKinematics`] is the only thing that moves vertices.
#[derive(Debug, Clone)]
pub struct Planet {
    settings: PlanetSettings,
    mesh: SphereMesh,
    plates: Vec<Plate>,
    plate_map: VertexPlateMap,
    boundaries: PlateBoundaries,
    kinematics: PlateKinematics,
    rng: StdRng,
}

impl Planet {
    /// Builds the mesh, seeds plates, classifies vertices and derives the
    /// boundary graph, in that order.
    pub fn generate(settings: PlanetSettings, config: &TectonicsConfig) -> Result<Self> {
        if settings.plate_count == 0 {
            return Err(PlanetError::NoPlates);
        }
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let mesh = IcosphereBuilder::new(settings.radius, settings.subdivision_level).build(&mut rng)?;
        let plates = PlateSeeder::new(settings.radius, config).seed_plates(settings.plate_count, &mut rng);
        Self::assemble(settings, config, rng, mesh, plates)
    }

    /// Same as [`generate`](Self::generate) but with caller-supplied plates.
    /// Plate ids are renumbered to match their position.
    pub fn with_plates(mut settings: PlanetSettings, config: &TectonicsConfig, mut plates: Vec<Plate>) -> Result<Self> {
        if plates.is_empty() {
            return Err(PlanetError::NoPlates);
        }
        for (id, plate) in plates.iter_mut().enumerate() {
            plate.id = id;
        }
        settings.plate_count = plates.len();
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let mesh = IcosphereBuilder::new(settings.radius, settings.subdivision_level).build(&mut rng)?;
        Self::assemble(settings, config, rng, mesh, plates)
    }

    /// Generates the planet and hands its initial buffers to `upload`.
    pub fn new<U: MeshUpload + ?Sized>(settings: PlanetSettings, config: &TectonicsConfig, upload: &mut U) -> Result<Self> {
        let planet = Self::generate(settings, config)?;
        upload.create(planet.mesh.vertices(), planet.mesh.indices());
        Ok(planet)
    }

    fn assemble(
        settings: PlanetSettings,
        config: &TectonicsConfig,
        rng: StdRng,
        mesh: SphereMesh,
        plates: Vec<Plate>,
    ) -> Result<Self> {
        let started = Instant::now();
        if mesh.is_empty() {
            return Err(PlanetError::EmptyMesh {
                vertices: mesh.vertex_count(),
                indices: mesh.indices().len(),
            });
        }

        let plate_map = classify(mesh.vertices(), &plates)?;
        let boundaries = BoundaryGraphBuilder::new(config.graph.laplacian_sign, config.graph.adjacency_rule)
            .build(&mesh, &plate_map, &plates);

        log::info!(
            "planet ready: {} vertices, {} triangles, {} plates, {} boundary vertices ({:.1} ms)",
            mesh.vertex_count(),
            mesh.triangle_count(),
            plates.len(),
            boundaries.boundary_vertex_count(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            settings,
            mesh,
            plates,
            plate_map,
            boundaries,
            kinematics: PlateKinematics::new(),
            rng,
        })
    }

    /// One simulation tick: reads the frame delta once, moves every plate,
    /// then forwards the finished vertex array exactly once.
    pub fn update_plates<T, U>(&mut self, timer: &T, upload: &mut U)
    where
        T: FrameTimer + ?Sized,
        U: MeshUpload + ?Sized,
    {
        self.tick(timer.delta_seconds());
        upload.update(self.mesh.vertices());
    }

    pub fn tick(&mut self, dt: f32) {
        self.kinematics
            .advance(&mut self.mesh, &self.plate_map, &self.plates, dt);
    }

    pub fn settings(&self) -> &PlanetSettings {
        &self.settings
    }

    pub fn radius(&self) -> f32 {
        self.settings.radius
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn plate(&self, id: PlateId) -> Option<&Plate> {
        self.plates.get(id)
    }

    pub fn plate_map(&self) -> &VertexPlateMap {
        &self.plate_map
    }

    pub fn boundaries(&self) -> &PlateBoundaries {
        &self.boundaries
    }

    pub fn kinematics(&self) -> &PlateKinematics {
        &self.kinematics
    }

    pub fn plate_vertices(&self, id: PlateId) -> impl Iterator<Item = usize> + '_ {
        self.plate_map.vertices_of(id)
    }

    pub fn boundary_vertices(&self, id: PlateId) -> impl Iterator<Item = usize> + '_ {
        self.boundaries.boundary_vertices_of(&self.plate_map, id)
    }

    /// Generator the planet was built from, advanced past all construction draws.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
