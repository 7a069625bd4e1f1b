use crate::classifier::VertexPlateMap;
use crate::mesh::{SphereMesh, Vertex};
use crate::plate::Plate;
use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KinematicsState {
    #[default]
    Idle,
    Ticking {
        ticks: u64,
        elapsed: f32,
    },
}

/// Rigid per-plate rotation applied once per tick.
///
/// Boundary and interior vertices move identically; nothing resolves the
/// gaps or overlaps that open up between plates.
#[derive(Debug, Clone, Default)]
pub struct PlateKinematics {
    state: KinematicsState,
    /// Back buffer swapped with the mesh's vertices on every tick.
    scratch: Vec<Vertex>,
}

impl PlateKinematics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> KinematicsState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        match self.state {
            KinematicsState::Idle => 0,
            KinematicsState::Ticking { ticks, .. } => ticks,
        }
    }

    /// Rotation a plate undergoes over `dt`.
    pub fn rotation(plate: &Plate, dt: f32) -> Quat {
        Quat::from_axis_angle(plate.axis, plate.angular_velocity * dt)
    }

    /// `q · (p, 0) · q⁻¹`, with `p` treated as a pure quaternion.
    pub fn rotate_point(q: Quat, p: Vec3) -> Vec3 {
        let pure = Quat::from_xyzw(p.x, p.y, p.z, 0.0);
        let rotated = q * pure * q.inverse();
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Rotates every vertex of every plate about that plate's axis.
    ///
    /// Non-finite `dt` is treated as zero. A skipped tick is not made up later.
    pub fn advance(&mut self, mesh: &mut SphereMesh, map: &VertexPlateMap, plates: &[Plate], dt: f32) {
        let dt = if dt.is_finite() {
            dt
        } else {
            log::warn!("ignoring non-finite tick delta {dt}");
            0.0
        };

        let rotations: Vec<Quat> = plates.iter().map(|p| Self::rotation(p, dt)).collect();
        let mut next = std::mem::take(&mut self.scratch);
        next.clear();
        next.extend(mesh.vertices().iter().zip(map.as_slice()).map(|(v, &plate)| {
            let q = rotations[plate];
            let mut moved = *v;
            if q != Quat::IDENTITY {
                moved.set_position(Self::rotate_point(q, v.position()));
                moved.normal = Self::rotate_point(q, v.normal()).to_array();
            }
            moved
        }));

        match mesh.replace_vertices(next) {
            Ok(previous) => self.scratch = previous,
            Err(err) => log::warn!("plate map does not cover the mesh, tick skipped: {err}"),
        }

        self.state = match self.state {
            KinematicsState::Idle => KinematicsState::Ticking { ticks: 1, elapsed: dt },
            KinematicsState::Ticking { ticks, elapsed } => KinematicsState::Ticking {
                ticks: ticks + 1,
                elapsed: elapsed + dt,
            },
        };
    }
}
