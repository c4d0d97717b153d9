//! Position and velocity in spherical and Cartesian form
//!
//! [`SphericalMotion`] carries longitude, latitude, distance and their time
//! derivatives; [`CartesianMotion`] carries a position vector and a velocity vector.
//! The time unit is whatever the caller uses; angular rates are radians per that unit.

use crate::coordinates::cartesian::Cartesian3;
use crate::scalar::Real;
use serde::{Deserialize, Serialize};

/// Spherical position and its rate of change
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalMotion<T = f64> {
    /// Longitude (radians)
    pub lon: T,
    /// Latitude (radians)
    pub lat: T,
    /// Radial distance
    pub distance: T,
    /// Longitude rate (radians per unit time)
    pub dlon: T,
    /// Latitude rate (radians per unit time)
    pub dlat: T,
    /// Radial velocity
    pub ddistance: T,
}

/// Cartesian position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianMotion<T = f64> {
    pub position: Cartesian3<T>,
    pub velocity: Cartesian3<T>,
}

impl<T: Real> SphericalMotion<T> {
    /// Converts to Cartesian position and velocity
    pub fn to_cartesian(&self) -> CartesianMotion<T> {
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        let (sin_lat, cos_lat) = self.lat.sin_cos();

        let r_cos_lat = self.distance * cos_lat;
        let x = r_cos_lat * cos_lon;
        let y = r_cos_lat * sin_lon;
        let r_dlat = self.distance * self.dlat;
        let w = r_dlat * sin_lat - cos_lat * self.ddistance;

        CartesianMotion {
            position: Cartesian3::new(x, y, self.distance * sin_lat),
            velocity: Cartesian3::new(
                -y * self.dlon - w * cos_lon,
                x * self.dlon - w * sin_lon,
                r_dlat * cos_lat + sin_lat * self.ddistance,
            ),
        }
    }

    /// Recovers spherical position and rates from Cartesian position and velocity
    ///
    /// Longitude is in (-π, π]. A null position takes its direction from the
    /// velocity instead. On the polar axis the longitude and both angular rates
    /// are zero.
    pub fn from_cartesian(motion: &CartesianMotion<T>) -> Self {
        let zero = T::zero();
        let velocity = motion.velocity;

        let mut p = motion.position;
        let mut rxy2 = p.x * p.x + p.y * p.y;
        let mut r2 = rxy2 + p.z * p.z;
        if r2 == zero {
            p = velocity;
            rxy2 = p.x * p.x + p.y * p.y;
            r2 = rxy2 + p.z * p.z;
        }

        let rxy = rxy2.sqrt();
        let xyp = p.x * velocity.x + p.y * velocity.y;

        let (lon, lat, dlon, dlat) = if rxy2 != zero {
            (
                p.y.atan2(p.x),
                p.z.atan2(rxy),
                (p.x * velocity.y - p.y * velocity.x) / rxy2,
                (velocity.z * rxy2 - p.z * xyp) / (r2 * rxy),
            )
        } else {
            let lat = if p.z != zero { p.z.atan2(rxy) } else { zero };
            (zero, lat, zero, zero)
        };

        let distance = r2.sqrt();
        let ddistance = if distance != zero {
            (xyp + p.z * velocity.z) / distance
        } else {
            zero
        };

        SphericalMotion {
            lon,
            lat,
            distance,
            dlon,
            dlat,
            ddistance,
        }
    }
}

impl<T: Real> CartesianMotion<T> {
    pub fn new(position: Cartesian3<T>, velocity: Cartesian3<T>) -> Self {
        CartesianMotion { position, velocity }
    }
}
