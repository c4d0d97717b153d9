//! Skykernel command-line tool
//!
//! Exposes the kernel's separation, rotation, solver and projection routines for
//! quick manual checks. Angles on the command line are in degrees.
//!
//! Usage:
//!   cargo run --bin skykernel -- sep 10 20 30 40
//!   cargo run --bin skykernel -- euler zxz 30 20 10
//!   cargo run --bin skykernel -- solve --matrix 2 1 -1 -3 -1 2 -2 1 2 --rhs 8 -11 -3
//!   cargo run --bin skykernel -- project 10.5 20.2 10 20

use clap::{Parser, Subcommand};
use nalgebra::{Matrix3, Vector3};
use skykernel::constants::RAD2DEG;
use skykernel::coordinates::angle::Angle;
use skykernel::coordinates::tangent::{deproject, project};
use skykernel::linalg::solver::{solve, SolverOptions};
use skykernel::{Axis, KernelError, Matrix3x3, SphericalDirection};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Skykernel command-line tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Spherical-astronomy vector, matrix and solver kernel",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Angular separation and bearing between two directions
    Sep {
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
    },

    /// Rotation matrix for an Euler sequence
    Euler {
        /// Axis order, e.g. "zxz" or "313"
        order: String,
        #[arg(allow_negative_numbers = true)]
        phi: f64,
        #[arg(allow_negative_numbers = true, default_value_t = 0.0)]
        theta: f64,
        #[arg(allow_negative_numbers = true, default_value_t = 0.0)]
        psi: f64,
    },

    /// Solve a 3x3 linear system
    Solve {
        /// Matrix elements, row by row
        #[arg(long, num_args = 9, required = true, allow_negative_numbers = true)]
        matrix: Vec<f64>,

        /// Right-hand side
        #[arg(long, num_args = 3, required = true, allow_negative_numbers = true)]
        rhs: Vec<f64>,

        /// Relative pivot tolerance (default: N times machine epsilon)
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Gnomonic projection of a point about a tangent point
    Project {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        tangent_lon: f64,
        #[arg(allow_negative_numbers = true)]
        tangent_lat: f64,
    },
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name, value);
}

fn direction_from_degrees(lon: f64, lat: f64) -> SphericalDirection {
    SphericalDirection::new(
        Angle::from_degrees(lon).to_radians(),
        Angle::from_degrees(lat).to_radians(),
    )
}

fn run_separation(lon1: f64, lat1: f64, lon2: f64, lat2: f64) {
    let a = direction_from_degrees(lon1, lat1);
    let b = direction_from_degrees(lon2, lat2);

    print_section_header("Separation");
    print_named_value("Separation (deg)", format!("{:.9}", a.separation(&b) * RAD2DEG));
    print_named_value("Bearing (deg)", format!("{:.9}", a.bearing(&b) * RAD2DEG));
}

fn run_euler(order: &str, phi: f64, theta: f64, psi: f64) -> Result<()> {
    let axes = Axis::parse_order(order)?;
    let [phi, theta, psi] = [phi, theta, psi].map(|deg| Angle::from_degrees(deg).to_radians());
    let m = Matrix3x3::from_euler(order, phi, theta, psi);

    print_section_header("Rotation Matrix");
    print_named_value("Axes", format!("{:?}", axes));
    for row in m.to_rows() {
        println!("{:>14.9} {:>14.9} {:>14.9}", row[0], row[1], row[2]);
    }
    print_named_value("Determinant", format!("{:.12}", m.determinant()));

    let axis = m.to_axis_vector();
    print_named_value(
        "Axial vector",
        format!("[{:.9}, {:.9}, {:.9}]", axis.x, axis.y, axis.z),
    );
    print_named_value("Rotation angle (deg)", format!("{:.9}", axis.magnitude() * RAD2DEG));
    Ok(())
}

fn run_solve(matrix: &[f64], rhs: &[f64], tolerance: Option<f64>) -> Result<()> {
    let a = Matrix3::from_row_slice(matrix);
    let b = Vector3::from_row_slice(rhs);
    let mut options = SolverOptions::default();
    if let Some(tolerance) = tolerance {
        options = options.with_relative_tolerance(tolerance);
    }

    print_section_header("Linear System");
    match solve(&a, &b, &options) {
        Ok(result) => {
            let x = result.solution;
            print_named_value("Solution", format!("[{}, {}, {}]", x[0], x[1], x[2]));
            print_named_value("Determinant", result.determinant);
            println!("Inverse:");
            for i in 0..3 {
                let inv = &result.inverse;
                println!(
                    "{:>14.9} {:>14.9} {:>14.9}",
                    inv[(i, 0)],
                    inv[(i, 1)],
                    inv[(i, 2)]
                );
            }
        }
        Err(e @ KernelError::SingularMatrix { .. }) => {
            println!("{}", e);
            print_named_value("Determinant", 0.0);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn run_project(lon: f64, lat: f64, tangent_lon: f64, tangent_lat: f64) {
    let point = direction_from_degrees(lon, lat);
    let tangent = direction_from_degrees(tangent_lon, tangent_lat);
    let plane = project(&point, &tangent);

    print_section_header("Gnomonic Projection");
    print_named_value("Status", format!("{:?}", plane.status));
    print_named_value("xi (deg)", format!("{:.9}", plane.xi * RAD2DEG));
    print_named_value("eta (deg)", format!("{:.9}", plane.eta * RAD2DEG));

    let back = deproject(plane.xi, plane.eta, &tangent);
    print_named_value(
        "Deprojected (deg)",
        format!("{:.9}, {:.9}", back.lon_degrees(), back.lat_degrees()),
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Sep {
            lon1,
            lat1,
            lon2,
            lat2,
        } => run_separation(lon1, lat1, lon2, lat2),
        Command::Euler {
            order,
            phi,
            theta,
            psi,
        } => run_euler(&order, phi, theta, psi)?,
        Command::Solve {
            matrix,
            rhs,
            tolerance,
        } => run_solve(&matrix, &rhs, tolerance)?,
        Command::Project {
            lon,
            lat,
            tangent_lon,
            tangent_lat,
        } => run_project(lon, lat, tangent_lon, tangent_lat),
    }

    Ok(())
}
