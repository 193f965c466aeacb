//! Shared numeric constants for the canvas crate.

// ── Scale ───────────────────────────────────────────────────────

/// Scene units per meter of real floor space.
pub const PX_PER_METER: f64 = 15.0;

/// Short side of a court footprint, in meters.
pub const COURT_WIDTH_M: f64 = 10.0;

/// Long side of a court footprint, in meters.
pub const COURT_LENGTH_M: f64 = 20.0;

/// Court width in scene units.
pub const COURT_WIDTH: f64 = COURT_WIDTH_M * PX_PER_METER;

/// Court height in scene units.
pub const COURT_HEIGHT: f64 = COURT_LENGTH_M * PX_PER_METER;

/// Edge length of a freshly created zone, in scene units.
pub const ZONE_DEFAULT_SIZE: f64 = 10.0 * PX_PER_METER;

/// Smallest width or height a resizable element may have.
pub const MIN_SIZE: f64 = 20.0;

/// World-space center where new elements are placed.
pub const SPAWN_X: f64 = 300.0;
pub const SPAWN_Y: f64 = 300.0;

// ── Camera ──────────────────────────────────────────────────────

pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 10.0;

/// Multiplicative zoom step per wheel notch.
pub const ZOOM_WHEEL_STEP: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Tolerance for float comparisons on angles, in degrees.
pub const ANGLE_EPSILON_DEG: f64 = 1e-6;
