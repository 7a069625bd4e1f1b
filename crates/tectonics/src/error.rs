use thiserror::Error;

/// Failures raised while building or mutating a planet.
///
/// Construction errors are fatal: a planet is never handed out with empty
/// geometry or unassigned vertices.
#[derive(Debug, Error)]
pub enum PlanetError {
    #[error("plate count must be at least 1")]
    NoPlates,
    #[error("mesh is empty ({vertices} vertices, {indices} indices)")]
    EmptyMesh { vertices: usize, indices: usize },
    #[error("planet radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("subdivision level {requested} exceeds the maximum of {max}")]
    SubdivisionTooDeep { requested: u32, max: u32 },
    #[error("vertex count mismatch: mesh has {expected}, replacement has {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },
    #[error("failed to access config file: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config value {field} = {value}: must be finite and non-negative")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PlanetError>;
