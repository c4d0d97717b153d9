//! Angles and angle-range normalization
//!
//! [`Angle`] keeps a value in the unit it was given (degrees, radians or
//! arcseconds) and converts only when read in another unit, so values typed in
//! by hand survive a round trip unchanged.
//!
//! ## Range Normalization
//!
//! [`normalize_positive`] folds any angle into `[0, 2π)`, the convention for
//! longitudes and right ascensions. [`normalize_signed`] folds into `[-π, π)`, the
//! convention for hour angles and longitude differences. Both are generic over
//! [`Real`] and work for either precision.
//!
//! ## Examples
//!
//! ```rust
//! use skykernel::coordinates::angle::{normalize_positive, Angle};
//! use std::f64::consts::PI;
//!
//! let ra = Angle::from_degrees(101.287);
//! assert_eq!(ra.to_degrees(), 101.287);
//!
//! // Negative longitudes wrap into [0, 2π)
//! assert!((normalize_positive(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-15);
//! ```

use crate::constants::{ASEC2RAD, DEG2RAD, RAD2DEG};
use crate::scalar::Real;
use serde::{Deserialize, Serialize};

/// Folds an angle into the range `[0, 2π)`
///
/// # Examples
///
/// ```rust
/// use skykernel::coordinates::angle::normalize_positive;
/// use std::f64::consts::PI;
///
/// assert_eq!(normalize_positive(0.5), 0.5);
/// assert!((normalize_positive(2.0 * PI + 0.5) - 0.5).abs() < 1e-15);
/// assert!((normalize_positive(-0.5_f32) - (2.0 * std::f32::consts::PI - 0.5)).abs() < 1e-6);
/// ```
pub fn normalize_positive<T: Real>(angle: T) -> T {
    let tau = T::TAU();
    let mut result = angle % tau;
    if result < T::zero() {
        result += tau;
    }
    // A tiny negative remainder can round up to exactly 2π
    if result >= tau {
        result = T::zero();
    }
    result
}

/// Folds an angle into the range `[-π, π)`
///
/// # Examples
///
/// ```rust
/// use skykernel::coordinates::angle::normalize_signed;
/// use std::f64::consts::PI;
///
/// assert_eq!(normalize_signed(0.5), 0.5);
/// assert!((normalize_signed(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-15);
/// assert_eq!(normalize_signed(PI), -PI);
/// ```
pub fn normalize_signed<T: Real>(angle: T) -> T {
    let tau = T::TAU();
    let pi = T::PI();
    let mut result = angle % tau;
    if result >= pi {
        result -= tau;
    } else if result < -pi {
        result += tau;
    }
    result
}

/// Unit an [`Angle`] was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degrees,
    Radians,
    Arcseconds,
}

/// Angular quantity that remembers the unit it was created in
///
/// Reading it back in that unit returns the value unchanged, so a catalogue
/// declination of 45° comes back as exactly 45.0. Conversion happens on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    value: f64,
    unit: AngleUnit,
}

impl Angle {
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::angle::Angle;
    ///
    /// let dec = Angle::from_degrees(-16.716);
    /// assert_eq!(dec.to_degrees(), -16.716);
    /// ```
    pub fn from_degrees(degrees: f64) -> Self {
        Angle {
            value: degrees,
            unit: AngleUnit::Degrees,
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        Angle {
            value: radians,
            unit: AngleUnit::Radians,
        }
    }

    pub fn from_arcseconds(arcseconds: f64) -> Self {
        Angle {
            value: arcseconds,
            unit: AngleUnit::Arcseconds,
        }
    }

    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    pub fn to_degrees(&self) -> f64 {
        match self.unit {
            AngleUnit::Degrees => self.value,
            AngleUnit::Radians => self.value * RAD2DEG,
            AngleUnit::Arcseconds => self.value / 3600.0,
        }
    }

    pub fn to_radians(&self) -> f64 {
        match self.unit {
            AngleUnit::Degrees => self.value * DEG2RAD,
            AngleUnit::Radians => self.value,
            AngleUnit::Arcseconds => self.value * ASEC2RAD,
        }
    }

    pub fn to_arcseconds(&self) -> f64 {
        match self.unit {
            AngleUnit::Degrees => self.value * 3600.0,
            AngleUnit::Radians => self.value / ASEC2RAD,
            AngleUnit::Arcseconds => self.value,
        }
    }

    /// Folded into `[0, 2π)`; the result is in radians
    pub fn normalized_positive(&self) -> Angle {
        Angle::from_radians(normalize_positive(self.to_radians()))
    }

    /// Folded into `[-π, π)`; the result is in radians
    pub fn normalized_signed(&self) -> Angle {
        Angle::from_radians(normalize_signed(self.to_radians()))
    }
}

impl From<Angle> for f64 {
    /// Radians
    fn from(angle: Angle) -> f64 {
        angle.to_radians()
    }
}
