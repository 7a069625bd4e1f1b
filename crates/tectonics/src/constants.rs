/// Deepest subdivision accepted; 10·4^9 + 2 vertices still fits `u32` indices comfortably.
pub const MAX_SUBDIVISION_LEVEL: u32 = 9;

/// Tolerance used when comparing positions against the sphere radius.
pub const RADIUS_EPSILON: f32 = 1e-4;

/// Base tint of freshly built sphere vertices, jittered per base vertex.
pub const SURFACE_BASE_COLOR: [f32; 3] = [0.35, 0.55, 0.75];
pub const SURFACE_COLOR_JITTER: f32 = 0.15;

/// Color used for boundary vertices in the boundary view when no plate pair is classified.
pub const UNCLASSIFIED_BOUNDARY_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
