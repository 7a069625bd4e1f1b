use glam::Vec3;

pub type PlateId = usize;

/// A rigid partition of the sphere rotating about its own axis.
///
/// Vertex ownership is not stored here; it is derived from the
/// [`VertexPlateMap`](crate::classifier::VertexPlateMap).
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub id: PlateId,
    /// Classification anchor. Deliberately jittered off the sphere surface.
    pub seed: Vec3,
    /// Unit rotation axis through the planet centre.
    pub axis: Vec3,
    /// Signed angular speed in radians per time unit.
    pub angular_velocity: f32,
    pub color: [f32; 4],
}

impl Plate {
    pub fn new(id: PlateId, seed: Vec3, axis: Vec3, angular_velocity: f32, color: [f32; 4]) -> Self {
        Self {
            id,
            seed,
            axis: axis.normalize_or(Vec3::Y),
            angular_velocity,
            color,
        }
    }

    /// Angular velocity as a vector (axis scaled by speed).
    pub fn omega(&self) -> Vec3 {
        self.axis * self.angular_velocity
    }

    /// Linear velocity of a surface point carried by this plate.
    pub fn surface_velocity(&self, point: Vec3) -> Vec3 {
        self.omega().cross(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_normalized_on_construction() {
        let plate = Plate::new(0, Vec3::X, Vec3::new(0.0, 0.0, 3.0), 0.5, [1.0; 4]);
        assert_eq!(plate.axis, Vec3::Z);
        assert_eq!(plate.omega(), Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn zero_axis_falls_back_to_y() {
        let plate = Plate::new(0, Vec3::X, Vec3::ZERO, 1.0, [1.0; 4]);
        assert_eq!(plate.axis, Vec3::Y);
    }

    #[test]
    fn surface_velocity_is_tangent() {
        let plate = Plate::new(1, Vec3::X, Vec3::Z, 2.0, [1.0; 4]);
        let v = plate.surface_velocity(Vec3::X);
        assert!((v - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        assert!(v.dot(Vec3::X).abs() < 1e-6);
    }
}
