//! Shared numeric constants for the construction-guide subsystem.

/// Maximum number of guides a store will hold.
pub const MAX_GUIDES: usize = 500;

/// Maximum number of construction points a store will hold.
pub const MAX_SNAP_POINTS: usize = 5000;

/// Two guides on the same orientation must differ by at least this much.
/// Creation requests closer than this to an existing offset are rejected.
pub const MIN_OFFSET_DELTA: f64 = 0.001;

/// Geometric epsilon: segments shorter than this are treated as degenerate.
pub const MIN_DISTANCE: f64 = 1e-4;

/// Tolerance applied when testing whether an angle lies inside an arc's
/// sweep, in degrees.
pub const ANGLE_TOLERANCE_DEG: f64 = 0.01;

/// Half-length of the finite segment an infinite guide is extended to
/// before rotation, and the spoke length of polar arrays.
pub const DEFAULT_ROTATION_EXTENT: f64 = 10_000.0;
