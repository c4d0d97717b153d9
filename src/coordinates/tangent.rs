//! Gnomonic (tangent-plane) projection
//!
//! Projects directions onto the plane tangent to the unit sphere at a chosen
//! tangent point, producing the "standard coordinates" ξ (xi, increasing toward
//! positive longitude) and η (eta, increasing toward positive latitude), and maps them
//! back. Both a spherical and a Cartesian form are provided.
//!
//! Projection is well defined only for points in the hemisphere centred on the
//! tangent point. Points near or beyond the edge are still projected, with the
//! distance along the projection axis clamped, and the returned [`ProjectionStatus`]
//! says which case applied.
//!
//! The inverse problem, finding where the tangent point must be given a star and
//! its standard coordinates, is solved by [`tangent_point`] and
//! [`tangent_point_vector`]. Away from the poles it has exactly one useful answer.

use crate::constants::{POLAR_TANGENT_EPSILON, TANGENT_PLANE_TINY};
use crate::coordinates::angle::normalize_positive;
use crate::coordinates::cartesian::Cartesian3;
use crate::coordinates::spherical::SphericalDirection;
use crate::scalar::Real;

/// Outcome of projecting a point onto the tangent plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionStatus {
    /// Point is in the hemisphere facing the tangent point
    Ok,
    /// Point is almost 90° from the tangent point; coordinates are clamped
    TooFarFromAxis,
    /// Antipode of the point lies on the tangent plane; coordinates are clamped
    AntistarOnPlane,
    /// Point is more than 90° from the tangent point; coordinates describe its antipode
    AntistarTooFar,
}

/// Standard coordinates of a projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCoordinates<T = f64> {
    pub xi: T,
    pub eta: T,
    pub status: ProjectionStatus,
}

impl ProjectionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProjectionStatus::Ok)
    }
}

/// Classifies the axial distance and clamps it away from zero
fn classify<T: Real>(denom: T) -> (T, ProjectionStatus) {
    let tiny = T::narrow(TANGENT_PLANE_TINY);
    if denom > tiny {
        (denom, ProjectionStatus::Ok)
    } else if denom >= T::zero() {
        (tiny, ProjectionStatus::TooFarFromAxis)
    } else if denom > -tiny {
        (-tiny, ProjectionStatus::AntistarOnPlane)
    } else {
        (denom, ProjectionStatus::AntistarTooFar)
    }
}

/// Projects a spherical direction onto the plane tangent at `tangent`
///
/// # Examples
///
/// ```rust
/// use skykernel::coordinates::spherical::SphericalDirection;
/// use skykernel::coordinates::tangent::{project, ProjectionStatus};
///
/// let centre: SphericalDirection<f64> = SphericalDirection::new(1.0, 0.5);
/// let plane = project(&centre, &centre);
/// assert_eq!(plane.status, ProjectionStatus::Ok);
/// assert!(plane.xi.abs() < 1e-15);
/// assert!(plane.eta.abs() < 1e-15);
/// ```
pub fn project<T: Real>(
    point: &SphericalDirection<T>,
    tangent: &SphericalDirection<T>,
) -> PlaneCoordinates<T> {
    let (sin_tlat, cos_tlat) = tangent.lat.sin_cos();
    let (sin_lat, cos_lat) = point.lat.sin_cos();
    let (sin_dlon, cos_dlon) = (point.lon - tangent.lon).sin_cos();

    let (denom, status) = classify(sin_lat * sin_tlat + cos_lat * cos_tlat * cos_dlon);

    PlaneCoordinates {
        xi: cos_lat * sin_dlon / denom,
        eta: (sin_lat * cos_tlat - cos_lat * sin_tlat * cos_dlon) / denom,
        status,
    }
}

/// Maps standard coordinates back to a spherical direction
///
/// The returned longitude is in `[0, 2π)`.
pub fn deproject<T: Real>(
    xi: T,
    eta: T,
    tangent: &SphericalDirection<T>,
) -> SphericalDirection<T> {
    let (sin_tlat, cos_tlat) = tangent.lat.sin_cos();
    let denom = cos_tlat - eta * sin_tlat;

    SphericalDirection {
        lon: normalize_positive(xi.atan2(denom) + tangent.lon),
        lat: (sin_tlat + eta * cos_tlat).atan2((xi * xi + denom * denom).sqrt()),
    }
}

/// Projects a direction vector onto the plane tangent at the unit vector `tangent`
///
/// `point` need not be unit length but must not be zero. If `tangent` lies on a
/// pole the result assumes a tangent-point longitude of zero.
pub fn project_vector<T: Real>(
    point: &Cartesian3<T>,
    tangent: &Cartesian3<T>,
) -> PlaneCoordinates<T> {
    let mut x0 = tangent.x;
    let y0 = tangent.y;
    let z0 = tangent.z;
    let r2 = x0 * x0 + y0 * y0;
    let mut r = r2.sqrt();
    if r == T::zero() {
        r = T::narrow(POLAR_TANGENT_EPSILON);
        x0 = r;
    }

    let w = point.x * x0 + point.y * y0;
    let (denom, status) = classify(w + point.z * z0);
    let denom = denom * r;

    PlaneCoordinates {
        xi: (point.y * x0 - point.x * y0) / denom,
        eta: (point.z * r2 - z0 * w) / denom,
        status,
    }
}

/// Maps standard coordinates back to a unit vector, given the unit tangent vector
///
/// If `tangent` lies on a pole the result assumes a tangent-point longitude of zero.
pub fn deproject_vector<T: Real>(xi: T, eta: T, tangent: &Cartesian3<T>) -> Cartesian3<T> {
    let mut x = tangent.x;
    let y = tangent.y;
    let z = tangent.z;
    let f = (T::one() + xi * xi + eta * eta).sqrt();
    let mut r = (x * x + y * y).sqrt();
    if r == T::zero() {
        r = T::narrow(POLAR_TANGENT_EPSILON);
        x = r;
    }

    Cartesian3::new(
        (x - (xi * y + eta * x * z) / r) / f,
        (y + (xi * x - eta * y * z) / r) / f,
        (z + eta * r) / f,
    )
}

/// Tangent points that place a star at given standard coordinates
///
/// Two candidates are always computed when any exist. Usually only `primary` is
/// useful and `over_the_pole` is the geometric solution on the far side of the
/// pole. Near a pole both can be genuine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TangentPointSolutions<P> {
    /// No tangent point produces these coordinates
    None,
    /// Only the first solution is useful
    One { primary: P, over_the_pole: P },
    /// Both solutions are useful
    Two { primary: P, secondary: P },
}

impl<P> TangentPointSolutions<P> {
    /// Number of useful solutions
    pub fn count(&self) -> usize {
        match self {
            TangentPointSolutions::None => 0,
            TangentPointSolutions::One { .. } => 1,
            TangentPointSolutions::Two { .. } => 2,
        }
    }

    /// The first solution, if there is one
    pub fn primary(&self) -> Option<&P> {
        match self {
            TangentPointSolutions::None => None,
            TangentPointSolutions::One { primary, .. } => Some(primary),
            TangentPointSolutions::Two { primary, .. } => Some(primary),
        }
    }

    fn from_pair(sdf_abs_below_one: bool, first: P, second: P) -> Self {
        if sdf_abs_below_one {
            TangentPointSolutions::One {
                primary: first,
                over_the_pole: second,
            }
        } else {
            TangentPointSolutions::Two {
                primary: first,
                secondary: second,
            }
        }
    }
}

/// Finds the tangent point given a star and its standard coordinates
///
/// Solution longitudes are in `[0, 2π)`. Latitudes are in `[-π/2, π/2]` except for
/// over-the-pole solutions, which may lie outside it. No solution exists only near
/// the poles; a star exactly at a pole cannot have a non-zero `xi`.
///
/// # Examples
///
/// ```rust
/// use skykernel::coordinates::spherical::SphericalDirection;
/// use skykernel::coordinates::tangent::{project, tangent_point};
///
/// let centre: SphericalDirection<f64> = SphericalDirection::new(1.0, 0.4);
/// let star = SphericalDirection::new(1.02, 0.43);
/// let plane = project(&star, &centre);
///
/// let found = tangent_point(plane.xi, plane.eta, &star);
/// assert_eq!(found.count(), 1);
/// let recovered = found.primary().unwrap();
/// assert!((recovered.lon - 1.0).abs() < 1e-12);
/// assert!((recovered.lat - 0.4).abs() < 1e-12);
/// ```
pub fn tangent_point<T: Real>(
    xi: T,
    eta: T,
    star: &SphericalDirection<T>,
) -> TangentPointSolutions<SphericalDirection<T>> {
    let (zero, one) = (T::zero(), T::one());
    let x2 = xi * xi;
    let y2 = eta * eta;
    let (sin_lat, cos_lat) = star.lat.sin_cos();
    let sdf = sin_lat * (one + x2 + y2).sqrt();
    let r2 = cos_lat * cos_lat * (one + y2) - sin_lat * sin_lat * x2;
    if r2 < zero {
        return TangentPointSolutions::None;
    }

    let root = r2.sqrt();
    let solve = |r: T| {
        let s = sdf - eta * r;
        let c = sdf * eta + r;
        // Star on the polar axis with xi = 0: any longitude works, keep the star's
        let r_lon = if xi == zero && r == zero { one } else { r };
        SphericalDirection {
            lon: normalize_positive(star.lon - xi.atan2(r_lon)),
            lat: s.atan2(c),
        }
    };

    let first = solve(root);
    let second = solve(-root);
    TangentPointSolutions::from_pair(sdf.abs() < one, first, second)
}

/// Finds the tangent point given a unit star vector and its standard coordinates
///
/// Vector form of [`tangent_point`]; the solutions are unit vectors. `star` must be
/// of unit length.
pub fn tangent_point_vector<T: Real>(
    xi: T,
    eta: T,
    star: &Cartesian3<T>,
) -> TangentPointSolutions<Cartesian3<T>> {
    let (x, y, z) = (star.x, star.y, star.z);
    let rxy2 = x * x + y * y;
    let xi2 = xi * xi;
    let eta2p1 = eta * eta + T::one();
    let sdf = z * (xi2 + eta2p1).sqrt();
    let r2 = rxy2 * eta2p1 - z * z * xi2;
    if r2 <= T::zero() {
        return TangentPointSolutions::None;
    }

    let root = r2.sqrt();
    let scale = eta2p1 * (rxy2 * (r2 + xi2)).sqrt();
    let solve = |r: T| {
        let c = (sdf * eta + r) / scale;
        Cartesian3::new(
            c * (x * r + y * xi),
            c * (y * r - x * xi),
            (sdf - eta * r) / eta2p1,
        )
    };

    let first = solve(root);
    let second = solve(-root);
    TangentPointSolutions::from_pair(sdf.abs() < T::one(), first, second)
}
