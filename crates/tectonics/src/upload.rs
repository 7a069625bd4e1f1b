//! Seams to the renderer and the frame clock.

use crate::mesh::Vertex;

/// Receives mesh data for the GPU.
///
/// Both methods borrow their arrays only for the duration of the call; an
/// implementation that needs the data later must copy it before returning.
/// That is what lets the planet overwrite its vertices on the next tick.
pub trait MeshUpload {
    fn create(&mut self, vertices: &[Vertex], indices: &[u32]);
    fn update(&mut self, vertices: &[Vertex]);
}

/// Source of the elapsed time for one tick.
pub trait FrameTimer {
    fn delta_seconds(&self) -> f32;
}

/// A fixed step.
impl FrameTimer for f32 {
    fn delta_seconds(&self) -> f32 {
        *self
    }
}

impl<T: MeshUpload + ?Sized> MeshUpload for &mut T {
    fn create(&mut self, vertices: &[Vertex], indices: &[u32]) {
        (**self).create(vertices, indices);
    }

    fn update(&mut self, vertices: &[Vertex]) {
        (**self).update(vertices);
    }
}

/// Keeps a copy of whatever it is sent. Useful headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingUpload {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub creates: usize,
    pub updates: usize,
}

impl MeshUpload for RecordingUpload {
    fn create(&mut self, vertices: &[Vertex], indices: &[u32]) {
        self.vertices = vertices.to_vec();
        self.indices = indices.to_vec();
        self.creates += 1;
    }

    fn update(&mut self, vertices: &[Vertex]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.updates += 1;
    }
}
