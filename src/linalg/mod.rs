//! Linear algebra on small dense systems

pub mod solver;

pub use solver::{determinant, invert, solve, solve_in_place, Solution, SolverOptions};
