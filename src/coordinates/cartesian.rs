//! # Cartesian Coordinate System Module
//!
//! This module provides the 3-component vector type that every other part of the
//! kernel is built on: spherical conversions produce it, rotation matrices act on it
//! and angular separations are measured between two of them.
//!
//! ## Coordinate System Convention
//!
//! This implementation follows astronomical conventions:
//! - **X-axis**: Points toward zero longitude and latitude (RA = 0°, Dec = 0°)
//! - **Y-axis**: Points toward longitude 90°, latitude 0°
//! - **Z-axis**: Points toward the positive latitude pole (Dec = +90°)
//!
//! ## Precision
//!
//! `Cartesian3<T>` is generic over [`Real`], so single- and double-precision vectors
//! are distinct types with identical semantics. The default parameter is `f64`, and the
//! aliases [`Cartesian3f`] and [`Cartesian3d`] name the two instantiations explicitly.
//! The type does not track whether a vector is unit length; callers do.
//!
//! ## Degenerate Inputs
//!
//! No operation here fails. Normalizing the zero vector yields the zero vector with a
//! reported modulus of zero, and the separation of a zero vector from anything is zero.
//!
//! ## Examples
//!
//! ```rust
//! use skykernel::coordinates::cartesian::Cartesian3;
//!
//! // Unit vector pointing toward the origin of longitude
//! let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
//!
//! // Unit vector pointing toward the north pole
//! let north_pole = Cartesian3::new(0.0, 0.0, 1.0);
//!
//! // Perpendicular vectors have a zero dot product
//! assert_eq!(x_axis.dot(&north_pole), 0.0);
//! ```

use crate::scalar::Real;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// Three-dimensional Cartesian vector
///
/// Represents a direction, a point on or off the unit sphere, or a rotation
/// axis. The interpretation depends on the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cartesian3<T = f64> {
    /// X-component (toward zero longitude)
    pub x: T,
    /// Y-component (toward longitude 90°)
    pub y: T,
    /// Z-component (toward the positive latitude pole)
    pub z: T,
}

/// Single-precision vector
pub type Cartesian3f = Cartesian3<f32>;
/// Double-precision vector
pub type Cartesian3d = Cartesian3<f64>;

impl<T: Real> Cartesian3<T> {
    /// Creates a new Cartesian vector
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    ///
    /// let coord = Cartesian3::new(1.0, 0.0, 0.0);
    /// assert_eq!(coord.x, 1.0);
    /// assert_eq!(coord.y, 0.0);
    /// assert_eq!(coord.z, 0.0);
    /// ```
    pub fn new(x: T, y: T, z: T) -> Self {
        Cartesian3 { x, y, z }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Cartesian3::new(T::zero(), T::zero(), T::zero())
    }

    /// Creates a vector from a `[x, y, z]` array
    pub fn from_array(components: [T; 3]) -> Self {
        Cartesian3::new(components[0], components[1], components[2])
    }

    /// Returns the components as a `[x, y, z]` array
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculates the modulus (Euclidean length) of the vector
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    ///
    /// let coord = Cartesian3::new(3.0, 4.0, 0.0);
    /// assert_eq!(coord.magnitude(), 5.0);
    /// ```
    pub fn magnitude(&self) -> T {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalizes the vector, returning the unit vector and the original modulus
    ///
    /// If the modulus is zero the returned vector is the zero vector and the
    /// reported modulus is zero. This never divides by zero and never fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    ///
    /// let (unit, modulus) = Cartesian3::new(3.0, 4.0, 0.0).normalize();
    /// assert_eq!(modulus, 5.0);
    /// assert_eq!(unit, Cartesian3::new(0.6, 0.8, 0.0));
    ///
    /// let (unit, modulus) = Cartesian3::<f64>::zero().normalize();
    /// assert_eq!(modulus, 0.0);
    /// assert_eq!(unit, Cartesian3::zero());
    /// ```
    pub fn normalize(&self) -> (Cartesian3<T>, T) {
        let modulus = self.magnitude();
        if modulus <= T::zero() {
            return (Cartesian3::zero(), T::zero());
        }
        (*self / modulus, modulus)
    }

    /// Calculates the dot product with another vector
    ///
    /// # Mathematical Formula
    ///
    /// `dot = x₁*x₂ + y₁*y₂ + z₁*z₂`
    pub fn dot(&self, other: &Cartesian3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculates the cross product with another vector
    ///
    /// The result is zero when the two vectors are parallel or either is zero.
    ///
    /// # Mathematical Formula
    ///
    /// ```text
    /// cross = (y₁*z₂ - z₁*y₂, z₁*x₂ - x₁*z₂, x₁*y₂ - y₁*x₂)
    /// ```
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
    /// assert_eq!(x_axis.cross(&y_axis), Cartesian3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(&self, other: &Cartesian3<T>) -> Cartesian3<T> {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Calculates the angle between this vector and another
    ///
    /// Neither vector needs to be unit length. The angle is computed as
    /// `atan2(|a×b|, a·b)`, which keeps full accuracy near 0 and π where an
    /// arc-cosine of the normalized dot product does not. The computation always
    /// runs in double precision, so single-precision callers get the double
    /// result rounded once.
    ///
    /// # Returns
    ///
    /// Angle in radians in [0, π]; zero if either vector is zero
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    /// use std::f64::consts::PI;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 2.0, 0.0);
    /// assert!((x_axis.separation(&y_axis) - PI / 2.0).abs() < 1e-15);
    /// ```
    pub fn separation(&self, other: &Cartesian3<T>) -> T {
        let a = self.widen();
        let b = other.widen();

        // |a×b| = |a||b| sin θ, a·b = |a||b| cos θ
        let (_, sine) = a.cross(&b).normalize();
        let cosine = a.dot(&b);

        if sine != 0.0 || cosine != 0.0 {
            T::narrow(sine.atan2(cosine))
        } else {
            T::zero()
        }
    }

    /// Calculates the position angle of `other` as seen from this direction
    ///
    /// Neither vector needs to be unit length. The position angle is measured from
    /// the direction of the positive latitude pole through positive longitude, so a
    /// point a small distance east of this one has a position angle of about +π/2.
    ///
    /// # Returns
    ///
    /// Position angle in radians in (-π, π]; zero if the two directions coincide
    pub fn position_angle(&self, other: &Cartesian3<T>) -> T {
        let (from, _) = self.normalize();

        let sq = other.y * from.x - other.x * from.y;
        let mut cq = other.z * (from.x * from.x + from.y * from.y)
            - from.z * (other.x * from.x + other.y * from.y);
        if sq == T::zero() && cq == T::zero() {
            cq = T::one();
        }
        sq.atan2(cq)
    }

    /// Converts the components to double precision
    pub fn widen(&self) -> Cartesian3<f64> {
        Cartesian3::new(self.x.widen(), self.y.widen(), self.z.widen())
    }

    /// Converts to nalgebra Vector3 for linear algebra operations
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    /// use nalgebra::Vector3;
    ///
    /// let coord = Cartesian3::new(1.0, 2.0, 3.0);
    /// let vec: Vector3<f64> = coord.to_vector3();
    /// assert_eq!(vec, Vector3::new(1.0, 2.0, 3.0));
    /// ```
    pub fn to_vector3(&self) -> Vector3<T> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra Vector3
    pub fn from_vector3(vec: Vector3<T>) -> Self {
        Cartesian3::new(vec[0], vec[1], vec[2])
    }
}

impl<T: Real> From<[T; 3]> for Cartesian3<T> {
    fn from(components: [T; 3]) -> Self {
        Cartesian3::from_array(components)
    }
}

impl<T: Real> From<Cartesian3<T>> for [T; 3] {
    fn from(v: Cartesian3<T>) -> Self {
        v.to_array()
    }
}

impl<T> Index<usize> for Cartesian3<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Cartesian3 index out of range: {}", index),
        }
    }
}

impl<T> IndexMut<usize> for Cartesian3<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Cartesian3 index out of range: {}", index),
        }
    }
}

// Arithmetic operations for convenience
impl<T: Real> Add for Cartesian3<T> {
    type Output = Cartesian3<T>;

    fn add(self, other: Cartesian3<T>) -> Cartesian3<T> {
        Cartesian3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T: Real> Sub for Cartesian3<T> {
    type Output = Cartesian3<T>;

    fn sub(self, other: Cartesian3<T>) -> Cartesian3<T> {
        Cartesian3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T: Real> Neg for Cartesian3<T> {
    type Output = Cartesian3<T>;

    fn neg(self) -> Cartesian3<T> {
        Cartesian3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T: Real> Mul<T> for Cartesian3<T> {
    type Output = Cartesian3<T>;

    fn mul(self, scalar: T) -> Cartesian3<T> {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl<T: Real> Div<T> for Cartesian3<T> {
    type Output = Cartesian3<T>;

    fn div(self, scalar: T) -> Cartesian3<T> {
        Cartesian3 {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}
