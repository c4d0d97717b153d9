//! Spherical coordinates and their mapping to Cartesian vectors
//!
//! A [`SphericalDirection`] is a longitude/latitude pair in radians: right ascension
//! and declination, hour angle and declination, ecliptic or galactic longitude and
//! latitude all use it. A [`SphericalPosition`] adds a distance along the direction ray.
//!
//! The Cartesian frame is right-handed with X toward zero longitude and latitude and
//! Z toward the positive latitude pole:
//!
//! ```text
//! x = r cos(lat) cos(lon)
//! y = r cos(lat) sin(lon)
//! z = r sin(lat)
//! ```
//!
//! Converting back never fails: the zero vector maps to (0, 0) and a vector along
//! either pole gets a longitude of zero.

use crate::coordinates::angle::normalize_positive;
use crate::coordinates::cartesian::Cartesian3;
use crate::scalar::Real;
use serde::{Deserialize, Serialize};

/// Direction on the sphere, angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalDirection<T = f64> {
    /// Longitude, right ascension or hour angle
    pub lon: T,
    /// Latitude or declination
    pub lat: T,
}

/// Direction on the sphere plus a distance along it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalPosition<T = f64> {
    pub direction: SphericalDirection<T>,
    pub distance: T,
}

impl<T: Real> SphericalDirection<T> {
    /// Creates a direction from longitude and latitude in radians
    ///
    /// The angles are stored as given; no range folding is applied.
    pub fn new(lon: T, lat: T) -> Self {
        SphericalDirection { lon, lat }
    }

    /// Create a direction with values in degrees
    pub fn from_degrees(lon_deg: T, lat_deg: T) -> Self {
        SphericalDirection::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    /// Get longitude in degrees
    pub fn lon_degrees(&self) -> T {
        self.lon.to_degrees()
    }

    /// Get latitude in degrees
    pub fn lat_degrees(&self) -> T {
        self.lat.to_degrees()
    }

    /// Converts to a unit vector (direction cosines)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::spherical::SphericalDirection;
    /// use std::f64::consts::PI;
    ///
    /// let pole = SphericalDirection::new(0.0, PI / 2.0).to_cartesian();
    /// assert!(pole.x.abs() < 1e-15);
    /// assert!(pole.y.abs() < 1e-15);
    /// assert!((pole.z - 1.0).abs() < 1e-15);
    /// ```
    pub fn to_cartesian(&self) -> Cartesian3<T> {
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        Cartesian3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat)
    }

    /// Recovers the direction of a Cartesian vector
    ///
    /// The vector need not be unit length; its scale is discarded. Longitude is in
    /// `[0, 2π)` and latitude in `[-π/2, π/2]`. The zero vector gives (0, 0), and a
    /// vector along either pole gives longitude 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::cartesian::Cartesian3;
    /// use skykernel::coordinates::spherical::SphericalDirection;
    /// use std::f64::consts::PI;
    ///
    /// let dir = SphericalDirection::from_cartesian(&Cartesian3::new(0.0, -2.0, 0.0));
    /// assert!((dir.lon - 3.0 * PI / 2.0).abs() < 1e-15);
    /// assert_eq!(dir.lat, 0.0);
    /// ```
    pub fn from_cartesian(v: &Cartesian3<T>) -> Self {
        let zero = T::zero();
        let r = (v.x * v.x + v.y * v.y).sqrt();
        let lon = if r == zero {
            zero
        } else {
            normalize_positive(v.y.atan2(v.x))
        };
        let lat = if v.z == zero { zero } else { v.z.atan2(r) };
        SphericalDirection { lon, lat }
    }

    /// Calculates the angle between this direction and another
    ///
    /// Both directions are converted to unit vectors and measured with
    /// [`Cartesian3::separation`], so the result agrees with the vector form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skykernel::coordinates::spherical::SphericalDirection;
    /// use std::f64::consts::PI;
    ///
    /// let a = SphericalDirection::new(0.0, 0.0);
    /// let b = SphericalDirection::new(PI / 2.0, 0.0);
    /// assert!((a.separation(&b) - PI / 2.0).abs() < 1e-12);
    /// ```
    pub fn separation(&self, other: &SphericalDirection<T>) -> T {
        self.to_cartesian().separation(&other.to_cartesian())
    }

    /// Calculates the bearing (position angle) of `other` as seen from this direction
    ///
    /// # Returns
    ///
    /// Bearing in radians in (-π, π]: +π/2 when `other` is due east, zero when the
    /// two directions coincide
    pub fn bearing(&self, other: &SphericalDirection<T>) -> T {
        let d_lon = other.lon - self.lon;
        let (sin_dlon, cos_dlon) = d_lon.sin_cos();
        let (sin_lat_a, cos_lat_a) = self.lat.sin_cos();
        let (sin_lat_b, cos_lat_b) = other.lat.sin_cos();

        let x = sin_lat_b * cos_lat_a - cos_lat_b * sin_lat_a * cos_dlon;
        let y = sin_dlon * cos_lat_b;
        if x != T::zero() || y != T::zero() {
            y.atan2(x)
        } else {
            T::zero()
        }
    }
}

impl<T: Real> SphericalPosition<T> {
    /// Creates a position from longitude, latitude (radians) and distance
    pub fn new(lon: T, lat: T, distance: T) -> Self {
        SphericalPosition {
            direction: SphericalDirection::new(lon, lat),
            distance,
        }
    }

    /// Converts to a Cartesian vector whose modulus is the distance
    pub fn to_cartesian(&self) -> Cartesian3<T> {
        self.direction.to_cartesian() * self.distance
    }

    /// Recovers longitude, latitude and distance from a Cartesian vector
    ///
    /// The distance is the vector's modulus; the zero vector gives an all-zero
    /// position.
    pub fn from_cartesian(v: &Cartesian3<T>) -> Self {
        SphericalPosition {
            direction: SphericalDirection::from_cartesian(v),
            distance: v.magnitude(),
        }
    }
}

impl<T: Real> From<SphericalDirection<T>> for Cartesian3<T> {
    fn from(direction: SphericalDirection<T>) -> Self {
        direction.to_cartesian()
    }
}

impl<T: Real> From<SphericalPosition<T>> for Cartesian3<T> {
    fn from(position: SphericalPosition<T>) -> Self {
        position.to_cartesian()
    }
}
