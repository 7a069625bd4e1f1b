use crate::helpers::mesh::planet_mesh;
use crate::planet::logic::scaled_delta;
use bevy::log::warn;
use bevy::prelude::{Assets, Handle, Mesh, Time};
use tectonics::mesh::Vertex;
use tectonics::mesh_data::{MeshData, positions_and_normals};
use tectonics::upload::{FrameTimer, MeshUpload};

/// Writes planet vertices into a Bevy mesh asset.
///
/// `create` adds a new asset; `update` overwrites positions and normals of
/// the asset created earlier (or the one passed to [`with_handle`]). Data is
/// copied into the asset before returning.
///
/// [`with_handle`]: BevyMeshUpload::with_handle
pub struct BevyMeshUpload<'a> {
    meshes: &'a mut Assets<Mesh>,
    handle: Option<Handle<Mesh>>,
}

impl<'a> BevyMeshUpload<'a> {
    pub fn new(meshes: &'a mut Assets<Mesh>) -> Self {
        Self { meshes, handle: None }
    }

    pub fn with_handle(meshes: &'a mut Assets<Mesh>, handle: Handle<Mesh>) -> Self {
        Self {
            meshes,
            handle: Some(handle),
        }
    }

    pub fn into_handle(self) -> Option<Handle<Mesh>> {
        self.handle
    }
}

impl MeshUpload for BevyMeshUpload<'_> {
    fn create(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let mesh = planet_mesh(MeshData::from_vertices(vertices, indices));
        self.handle = Some(self.meshes.add(mesh));
    }

    fn update(&mut self, vertices: &[Vertex]) {
        let Some(handle) = &self.handle else {
            warn!("planet mesh update before create");
            return;
        };
        let Some(mesh) = self.meshes.get_mut(handle) else {
            warn!("planet mesh asset {handle:?} missing, update dropped");
            return;
        };
        let (positions, normals) = positions_and_normals(vertices);
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    }
}

/// Frame delta from Bevy's clock, scaled by the simulation speed.
pub struct BevyFrameTimer {
    delta: f32,
}

impl BevyFrameTimer {
    pub fn new(time: &Time, time_scale: f32) -> Self {
        Self {
            delta: scaled_delta(time.delta_secs(), time_scale),
        }
    }
}

impl FrameTimer for BevyFrameTimer {
    fn delta_seconds(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;
    use tectonics::config::TectonicsConfig;
    use tectonics::planet::{Planet, PlanetSettings};

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(p)) => p.clone(),
            _ => panic!("missing positions"),
        }
    }

    #[test]
    fn create_then_update_rewrites_positions() {
        let mut meshes = Assets::<Mesh>::default();
        let settings = PlanetSettings::new(3, 1.0, 1).with_seed(4);
        let config = TectonicsConfig::default();

        let mut upload = BevyMeshUpload::new(&mut meshes);
        let mut planet = Planet::new(settings, &config, &mut upload).unwrap();
        let handle = upload.into_handle().unwrap();

        let before = positions(meshes.get(&handle).unwrap());
        assert_eq!(before.len(), planet.mesh().vertex_count());

        let mut upload = BevyMeshUpload::with_handle(&mut meshes, handle.clone());
        planet.update_plates(&10.0f32, &mut upload);

        let after = positions(meshes.get(&handle).unwrap());
        let expected: Vec<[f32; 3]> = planet
            .mesh()
            .vertices()
            .iter()
            .map(|v| [v.position[0], v.position[1], v.position[2]])
            .collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn update_without_create_is_ignored() {
        let mut meshes = Assets::<Mesh>::default();
        let mut upload = BevyMeshUpload::new(&mut meshes);
        upload.update(&[]);
        assert!(upload.into_handle().is_none());
    }

    #[test]
    fn timer_scales_frame_delta() {
        let mut time = Time::<()>::default();
        time.advance_by(std::time::Duration::from_millis(250));
        assert!((BevyFrameTimer::new(&time, 2.0).delta_seconds() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn update_with_removed_asset_is_dropped() {
        let mut meshes = Assets::<Mesh>::default();
        let mut upload = BevyMeshUpload::new(&mut meshes);
        upload.create(&[], &[]);
        let handle = upload.into_handle().unwrap();
        meshes.remove(&handle);

        let mut upload = BevyMeshUpload::with_handle(&mut meshes, handle.clone());
        upload.update(&[]);
        assert!(meshes.get(&handle).is_none());
    }
}
