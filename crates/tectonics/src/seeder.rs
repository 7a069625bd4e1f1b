use crate::config::TectonicsConfig;
use crate::plate::{Plate, PlateId};
use crate::tools::fork_rng;
use glam::Vec3;
use rand::Rng;
use rand::rngs::StdRng;
use std::ops::RangeInclusive;

/// Independent random sources for the three attribute groups of one plate.
pub struct PlateStreams {
    pub position: StdRng,
    pub color: StdRng,
    pub rotation: StdRng,
}

impl PlateStreams {
    pub fn fork<R: Rng + ?Sized>(parent: &mut R) -> Self {
        Self {
            position: fork_rng(parent),
            color: fork_rng(parent),
            rotation: fork_rng(parent),
        }
    }
}

/// Generates plate descriptors independently of any mesh.
#[derive(Debug, Clone)]
pub struct PlateSeeder {
    pub radius: f32,
    /// Fraction of the radius a seed may sit above or below the surface.
    pub seed_jitter: f32,
    pub angular_velocity: RangeInclusive<f32>,
    pub color_jitter: f32,
}

impl PlateSeeder {
    pub fn new(radius: f32, config: &TectonicsConfig) -> Self {
        Self {
            radius,
            seed_jitter: config.plates.seed_jitter.abs(),
            angular_velocity: config.angular_velocity_range(),
            color_jitter: config.plates.color_jitter.abs(),
        }
    }

    pub fn seed_plates<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Plate> {
        let plates: Vec<Plate> = (0..count)
            .map(|id| self.seed_plate(id, PlateStreams::fork(rng)))
            .collect();
        log::debug!("seeded {} plates", plates.len());
        plates
    }

    /// Draws the position, color and rotation of one plate concurrently.
    ///
    /// Each group reads only its own stream, so the result does not depend on
    /// scheduling. The axis needs the seed position and is formed after the join.
    pub fn seed_plate(&self, id: PlateId, streams: PlateStreams) -> Plate {
        let PlateStreams {
            mut position,
            mut color,
            mut rotation,
        } = streams;

        let (seed, (color, (random_dir, angular_velocity))) = rayon::join(
            move || self.draw_position(&mut position),
            move || {
                rayon::join(
                    move || self.draw_color(&mut color),
                    move || self.draw_rotation(&mut rotation),
                )
            },
        );

        let fallback = seed.normalize_or(Vec3::Y).any_orthonormal_vector();
        let axis = random_dir.cross(seed).normalize_or(fallback);
        Plate::new(id, seed, axis, angular_velocity, color)
    }

    fn draw_position(&self, rng: &mut StdRng) -> Vec3 {
        let dir = random_unit_vector(rng);
        let jitter = rng.random_range(-self.seed_jitter..=self.seed_jitter);
        dir * (self.radius + jitter * self.radius)
    }

    fn draw_color(&self, rng: &mut StdRng) -> [f32; 4] {
        let base = Vec3::new(rng.random(), rng.random(), rng.random());
        let jitter = Vec3::new(
            rng.random_range(-self.color_jitter..=self.color_jitter),
            rng.random_range(-self.color_jitter..=self.color_jitter),
            rng.random_range(-self.color_jitter..=self.color_jitter),
        );
        let rgb = (base + jitter).abs().normalize_or(Vec3::ONE.normalize());
        rgb.extend(1.0).to_array()
    }

    fn draw_rotation(&self, rng: &mut StdRng) -> (Vec3, f32) {
        let dir = random_cube_vector(rng);
        let speed = rng.random_range(self.angular_velocity.clone());
        (dir, speed)
    }
}

fn random_cube_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
    )
}

/// Uniform cube sample projected onto the unit sphere.
fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = random_cube_vector(rng);
        if v.length_squared() > 1e-6 {
            return v.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rstest::rstest;

    fn seeder(radius: f32) -> PlateSeeder {
        PlateSeeder::new(radius, &TectonicsConfig::default())
    }

    #[rstest]
    #[case(1, 1.0)]
    #[case(7, 10.0)]
    #[case(40, 0.5)]
    fn plates_respect_configured_ranges(#[case] count: usize, #[case] radius: f32) {
        let seeder = seeder(radius);
        let mut rng = StdRng::seed_from_u64(99);
        let plates = seeder.seed_plates(count, &mut rng);

        assert_eq!(plates.len(), count);
        for (i, plate) in plates.iter().enumerate() {
            assert_eq!(plate.id, i);
            let r = plate.seed.length();
            assert!(r >= radius * (1.0 - seeder.seed_jitter) - 1e-4);
            assert!(r <= radius * (1.0 + seeder.seed_jitter) + 1e-4);
            assert!((plate.axis.length() - 1.0).abs() < 1e-4);
            assert!(seeder.angular_velocity.contains(&plate.angular_velocity));
            let rgb = Vec3::new(plate.color[0], plate.color[1], plate.color[2]);
            assert!((rgb.length() - 1.0).abs() < 1e-4);
            assert_eq!(plate.color[3], 1.0);
        }
    }

    #[test]
    fn axis_is_perpendicular_to_seed() {
        let mut rng = StdRng::seed_from_u64(3);
        for plate in seeder(5.0).seed_plates(20, &mut rng) {
            assert!(plate.axis.dot(plate.seed.normalize()).abs() < 1e-4);
        }
    }

    #[test]
    fn same_seed_same_plates() {
        let s = seeder(2.0);
        let a = s.seed_plates(10, &mut StdRng::seed_from_u64(11));
        let b = s.seed_plates(10, &mut StdRng::seed_from_u64(11));
        let c = s.seed_plates(10, &mut StdRng::seed_from_u64(12));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn attribute_groups_are_independent() {
        let s = seeder(1.0);
        let streams = |k: u64| PlateStreams {
            position: StdRng::seed_from_u64(k),
            color: StdRng::seed_from_u64(100 + k),
            rotation: StdRng::seed_from_u64(200 + k),
        };
        let base = s.seed_plate(0, streams(0));

        // Changing only the color stream leaves position and rotation untouched.
        let mut recolored = streams(0);
        recolored.color = StdRng::seed_from_u64(999);
        let other = s.seed_plate(0, recolored);
        assert_eq!(other.seed, base.seed);
        assert_eq!(other.axis, base.axis);
        assert_eq!(other.angular_velocity, base.angular_velocity);
        assert_ne!(other.color, base.color);
    }

    #[test]
    fn zero_velocity_range_yields_static_plates() {
        let mut config = TectonicsConfig::default();
        config.plates.max_angular_velocity = 0.0;
        let s = PlateSeeder::new(1.0, &config);
        let plates = s.seed_plates(5, &mut StdRng::seed_from_u64(5));
        assert!(plates.iter().all(|p| p.angular_velocity == 0.0));
    }

    #[test]
    fn zero_plates_is_empty() {
        assert!(seeder(1.0).seed_plates(0, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
