//! Reference-frame rotations

pub mod rotation;

pub use rotation::{Axis, Matrix3x3};
