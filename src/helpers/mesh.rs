use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::Mesh;
use tectonics::mesh_data::MeshData;

/// Builds a Bevy mesh from engine-agnostic arrays. The asset stays in main
/// world memory so vertex positions can be rewritten every frame.
pub fn planet_mesh(data: MeshData) -> Mesh {
    let MeshData {
        positions,
        normals,
        colors,
        uvs,
        indices,
    } = data;

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
