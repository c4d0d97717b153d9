//! Skykernel: vector, matrix and spherical-coordinate kernel for positional astronomy
//!
//! This crate provides the small numerical core that higher-level astrometry is
//! built on: 3-vectors and their angular separations, 3x3 rotation matrices for
//! frame changes, spherical/Cartesian conversion, gnomonic projection, and a
//! Gauss-Jordan solver for small square systems. Everything is generic over
//! `f32` and `f64` through the [`scalar::Real`] trait.
//!
//! ```
//! use skykernel::{Matrix3x3, SphericalDirection};
//! use std::f64::consts::PI;
//!
//! let star = SphericalDirection::new(0.0, 0.0);
//! let rotated = Matrix3x3::from_euler("z", -PI / 2.0, 0.0, 0.0).apply(&star.to_cartesian());
//! let moved = SphericalDirection::from_cartesian(&rotated);
//! assert!((star.separation(&moved) - PI / 2.0).abs() < 1e-12);
//! ```

use thiserror::Error;

pub mod constants;
pub mod coordinates;
pub mod framelib;
pub mod linalg;
pub mod scalar;

// Re-export commonly used types
pub use coordinates::{Cartesian3, SphericalDirection, SphericalPosition};
pub use framelib::rotation::{Axis, Matrix3x3};
pub use linalg::solver::SolverOptions;
pub use scalar::Real;

/// Main error type for the kernel
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Singular matrix: pivot {pivot:e} in column {column} is at or below the threshold")]
    SingularMatrix { column: usize, pivot: f64 },

    #[error("System of size {size} exceeds the supported maximum of {max}")]
    SystemTooLarge { size: usize, max: usize },

    #[error("Invalid Euler axis order: {0:?}")]
    InvalidAxisOrder(String),
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;
