//! Floating-point scalar abstraction shared by the single- and double-precision kernels
//!
//! Every value type in this crate is generic over [`Real`], which is implemented for
//! `f32` and `f64` only. The trait adds the two conversions the kernel needs on top of
//! `num_traits::Float`: widening to `f64` for routines that must run at double precision
//! internally, and narrowing back to the caller's precision.

use num_traits::{Float, FloatConst, NumAssign};
use std::fmt::{Debug, Display};

/// Floating-point scalar usable by the kernel
pub trait Real:
    Float + FloatConst + NumAssign + Default + Debug + Display + Send + Sync + 'static
{
    /// Converts to `f64` without loss
    fn widen(self) -> f64;

    /// Converts from `f64`, rounding to the nearest representable value
    fn narrow(value: f64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl Real for f64 {
    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value
    }
}
