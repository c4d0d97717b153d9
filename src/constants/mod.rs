//! Constants module for the vector, matrix and spherical kernel

use std::f64::consts::PI;

// Angles
/// Arcseconds in a complete circle
pub const ASEC360: f64 = 1_296_000.0;
/// Arcseconds to radians conversion factor
pub const ASEC2RAD: f64 = 4.848_136_811_095_36e-6;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Linear solver
/// Largest system the Gauss-Jordan solver accepts
pub const MAX_SYSTEM_SIZE: usize = 6;

// Tangent-plane projection
/// Smallest acceptable distance of the projected point from the tangent plane
/// along the projection axis; closer points are flagged and clamped to this value
pub const TANGENT_PLANE_TINY: f64 = 1e-6;
/// Stand-in for `sqrt(x² + y²)` when a tangent point sits exactly on a pole
pub const POLAR_TANGENT_EPSILON: f64 = 1e-20;
