pub mod angle;
pub mod cartesian;
pub mod motion;
pub mod spherical;
pub mod tangent;

pub use angle::{normalize_positive, normalize_signed, Angle, AngleUnit};
pub use cartesian::{Cartesian3, Cartesian3d, Cartesian3f};
pub use motion::{CartesianMotion, SphericalMotion};
pub use spherical::{SphericalDirection, SphericalPosition};
pub use tangent::{PlaneCoordinates, ProjectionStatus, TangentPointSolutions};
