//! Gauss-Jordan solver for small square linear systems
//!
//! Solves `A · x = b` and inverts `A` in one pass, with partial pivoting by rows.
//! The systems this kernel meets (fitting plate constants, inverting frame
//! matrices) are at most [`MAX_SYSTEM_SIZE`] wide, so the dimension is a const
//! generic and everything lives on the stack.
//!
//! The in-place entry point [`solve_in_place`] mirrors the classic contract: the
//! matrix is overwritten by its inverse, the right-hand side by the solution, the
//! pivot workspace by the row chosen at each step, and the determinant is returned.
//! [`solve`] and [`invert`] wrap it for callers that want their inputs left alone.
//!
//! # Singularity
//!
//! A column is singular when its largest candidate pivot is at or below
//! `max(|a_ij|) · N · ε` (ε the machine epsilon of `T`), floored at the smallest
//! positive normal value. The relative form makes the test independent of the
//! overall scale of the matrix. [`SolverOptions`] overrides either term.
//!
//! ```
//! use nalgebra::{Matrix2, Vector2};
//! use skykernel::linalg::solver::{solve, SolverOptions};
//!
//! // 3x + 2y = 7, x + 4y = 9
//! let a: Matrix2<f64> = Matrix2::new(3.0, 2.0, 1.0, 4.0);
//! let b = Vector2::new(7.0, 9.0);
//!
//! let result = solve(&a, &b, &SolverOptions::default()).unwrap();
//! assert!((result.solution[0] - 1.0).abs() < 1e-12);
//! assert!((result.solution[1] - 2.0).abs() < 1e-12);
//! assert!((result.determinant - 10.0).abs() < 1e-12);
//! ```

use crate::constants::MAX_SYSTEM_SIZE;
use crate::scalar::Real;
use crate::{KernelError, Result};
use nalgebra::{SMatrix, SVector};

/// Pivot threshold settings
///
/// Leaving a term unset selects its default: a relative tolerance of `N · ε` and
/// an absolute floor of `T::min_positive_value()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverOptions {
    relative_tolerance: Option<f64>,
    absolute_floor: Option<f64>,
}

impl SolverOptions {
    /// Treats a pivot as zero when it is at or below `tolerance · max(|a_ij|)`
    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = Some(tolerance);
        self
    }

    /// Treats a pivot as zero when it is at or below `floor`, whatever the matrix scale
    pub fn with_absolute_floor(mut self, floor: f64) -> Self {
        self.absolute_floor = Some(floor);
        self
    }

    /// Pivot magnitude at or below which a column counts as singular
    pub fn threshold<T: Real>(&self, max_element: T, size: usize) -> T {
        let relative = match self.relative_tolerance {
            Some(tolerance) => T::narrow(tolerance),
            None => T::epsilon() * T::narrow(size as f64),
        };
        let floor = match self.absolute_floor {
            Some(floor) => T::narrow(floor),
            None => T::min_positive_value(),
        };
        (max_element * relative).max(floor)
    }
}

/// Everything [`solve`] computes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<T, const N: usize> {
    pub solution: SVector<T, N>,
    pub inverse: SMatrix<T, N, N>,
    pub determinant: T,
}

/// Solves `mat · x = rhs` and inverts `mat`, in place
///
/// On success `mat` holds its inverse, `rhs` the solution, `pivots[k]` the row
/// swapped into position `k` during elimination, and the determinant is returned.
/// On failure the contents of all three are unspecified.
///
/// # Errors
///
/// * [`KernelError::SystemTooLarge`] if `N` exceeds [`MAX_SYSTEM_SIZE`]; nothing is modified.
/// * [`KernelError::SingularMatrix`] if a pivot falls at or below the threshold.
pub fn solve_in_place<T: Real, const N: usize>(
    mat: &mut SMatrix<T, N, N>,
    rhs: &mut SVector<T, N>,
    pivots: &mut [usize; N],
    options: &SolverOptions,
) -> Result<T> {
    if N > MAX_SYSTEM_SIZE {
        return Err(KernelError::SystemTooLarge {
            size: N,
            max: MAX_SYSTEM_SIZE,
        });
    }

    let max_element = mat.iter().fold(T::zero(), |acc, a| acc.max(a.abs()));
    let threshold = options.threshold(max_element, N);
    let mut determinant = T::one();

    for k in 0..N {
        // Largest remaining entry in column k
        let mut imx = k;
        let mut amx = mat[(k, k)].abs();
        for i in (k + 1)..N {
            let candidate = mat[(i, k)].abs();
            if candidate > amx {
                imx = i;
                amx = candidate;
            }
        }

        if amx <= threshold {
            log::trace!(
                "column {} singular: pivot {} at or below threshold {}",
                k,
                amx,
                threshold
            );
            return Err(KernelError::SingularMatrix {
                column: k,
                pivot: amx.widen(),
            });
        }

        if imx != k {
            log::trace!("column {}: swapping rows {} and {}", k, k, imx);
            mat.swap_rows(k, imx);
            rhs.swap_rows(k, imx);
            determinant = -determinant;
        }
        pivots[k] = imx;

        let pivot = mat[(k, k)];
        determinant *= pivot;
        let inv_pivot = T::one() / pivot;
        mat[(k, k)] = inv_pivot;

        for j in (0..N).filter(|&j| j != k) {
            mat[(k, j)] *= inv_pivot;
        }
        let yk = rhs[k] * inv_pivot;
        rhs[k] = yk;

        for i in (0..N).filter(|&i| i != k) {
            let aik = mat[(i, k)];
            for j in (0..N).filter(|&j| j != k) {
                let delta = aik * mat[(k, j)];
                mat[(i, j)] -= delta;
            }
            rhs[i] -= aik * yk;
        }

        for i in (0..N).filter(|&i| i != k) {
            let scaled = -mat[(i, k)] * inv_pivot;
            mat[(i, k)] = scaled;
        }
    }

    // Undo the row interchanges as column interchanges, last pivot first
    for k in (0..N).rev() {
        let row = pivots[k];
        if row != k {
            mat.swap_columns(k, row);
        }
    }

    Ok(determinant)
}

/// Solves `mat · x = rhs` without touching the inputs
pub fn solve<T: Real, const N: usize>(
    mat: &SMatrix<T, N, N>,
    rhs: &SVector<T, N>,
    options: &SolverOptions,
) -> Result<Solution<T, N>> {
    let mut inverse = *mat;
    let mut solution = *rhs;
    let mut pivots = [0usize; N];
    let determinant = solve_in_place(&mut inverse, &mut solution, &mut pivots, options)?;
    Ok(Solution {
        solution,
        inverse,
        determinant,
    })
}

/// Inverts `mat` without touching it
pub fn invert<T: Real, const N: usize>(
    mat: &SMatrix<T, N, N>,
    options: &SolverOptions,
) -> Result<SMatrix<T, N, N>> {
    solve(mat, &SVector::zeros(), options).map(|s| s.inverse)
}

/// Determinant by elimination; zero for a matrix the solver reports singular
pub fn determinant<T: Real, const N: usize>(
    mat: &SMatrix<T, N, N>,
    options: &SolverOptions,
) -> Result<T> {
    match solve(mat, &SVector::zeros(), options) {
        Ok(s) => Ok(s.determinant),
        Err(KernelError::SingularMatrix { .. }) => Ok(T::zero()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
    use rstest::rstest;

    fn options() -> SolverOptions {
        SolverOptions::default()
    }

    #[test]
    fn test_identity_returns_rhs() {
        let mut mat = Matrix3::<f64>::identity();
        let mut rhs = Vector3::new(1.5, -2.0, 7.0);
        let mut pivots = [0usize; 3];

        let det = solve_in_place(&mut mat, &mut rhs, &mut pivots, &options()).unwrap();

        assert_eq!(det, 1.0);
        assert_eq!(rhs, Vector3::new(1.5, -2.0, 7.0));
        assert_eq!(mat, Matrix3::identity());
        assert_eq!(pivots, [0, 1, 2]);
    }

    #[test]
    fn test_solve_3x3() {
        let a = Matrix3::new(2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0);
        let b = Vector3::new(8.0, -11.0, -3.0);

        let result = solve(&a, &b, &options()).unwrap();

        assert_abs_diff_eq!(result.solution[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.solution[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.solution[2], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.determinant, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_3x3() {
        let a = Matrix3::new(1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0);
        let inv = invert(&a, &options()).unwrap();

        // Known inverse, det = 1
        let expected = Matrix3::new(-24.0, 18.0, 5.0, 20.0, -15.0, -4.0, -5.0, 4.0, 1.0);
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(inv[(i, j)], expected[(i, j)], epsilon = 1e-12);
            }
        }

        let id = a * inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(id[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_row_swap_flips_determinant_sign() {
        let mut mat = Matrix2::new(0.0, 1.0, 1.0, 0.0);
        let mut rhs = Vector2::new(2.0, 3.0);
        let mut pivots = [0usize; 2];

        let det = solve_in_place(&mut mat, &mut rhs, &mut pivots, &options()).unwrap();

        assert_eq!(det, -1.0);
        assert_eq!(rhs, Vector2::new(3.0, 2.0));
        assert_eq!(pivots, [1, 1]);
        // The permutation matrix is its own inverse
        assert_eq!(mat, Matrix2::new(0.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_row_is_singular() {
        let a = Matrix3::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0);
        let err = solve(&a, &Vector3::new(1.0, 1.0, 1.0), &options()).unwrap_err();
        assert!(matches!(err, KernelError::SingularMatrix { .. }));
    }

    #[test]
    fn test_dependent_rows_are_singular() {
        let a = Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0);
        match invert(&a, &options()) {
            Err(KernelError::SingularMatrix { column, pivot }) => {
                assert_eq!(column, 2);
                assert_eq!(pivot, 0.0);
            }
            other => panic!("expected singular matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        let a = Matrix2::<f64>::zeros();
        match invert(&a, &options()) {
            Err(KernelError::SingularMatrix { column, .. }) => assert_eq!(column, 0),
            other => panic!("expected singular matrix, got {:?}", other),
        }
        assert_eq!(determinant(&a, &options()).unwrap(), 0.0);
    }

    #[rstest]
    #[case(1e-30)]
    #[case(1.0)]
    #[case(1e30)]
    fn test_threshold_scales_with_matrix(#[case] scale: f64) {
        let a = Matrix2::new(2.0 * scale, 0.0, 0.0, 4.0 * scale);
        let b = Vector2::new(2.0 * scale, 8.0 * scale);
        let result = solve(&a, &b, &options()).unwrap();
        assert_abs_diff_eq!(result.solution[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.solution[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_configured_relative_tolerance() {
        let a = Matrix2::new(1.0, 0.0, 0.0, 0.1);
        assert!(solve(&a, &Vector2::new(1.0, 1.0), &options()).is_ok());

        let strict = SolverOptions::default().with_relative_tolerance(0.5);
        let err = solve(&a, &Vector2::new(1.0, 1.0), &strict).unwrap_err();
        assert!(matches!(err, KernelError::SingularMatrix { column: 1, .. }));
    }

    #[test]
    fn test_configured_absolute_floor() {
        let a = Matrix2::new(1e-3, 0.0, 0.0, 1e-3);
        let floored = SolverOptions::default().with_absolute_floor(1e-2);
        let err = invert(&a, &floored).unwrap_err();
        assert!(matches!(err, KernelError::SingularMatrix { column: 0, .. }));
    }

    #[test]
    fn test_single_precision() {
        let a = Matrix2::new(3.0f32, 2.0, 1.0, 4.0);
        let b = Vector2::new(7.0f32, 9.0);
        let result = solve(&a, &b, &options()).unwrap();
        assert_abs_diff_eq!(result.solution[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.solution[1], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.determinant, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_largest_supported_system() {
        let a = SMatrix::<f64, 6, 6>::from_fn(|i, j| if i == j { 2.0 } else { 0.1 });
        let inv = invert(&a, &options()).unwrap();
        let id = a * inv;
        for i in 0..6 {
            for j in 0..6 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(id[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_oversized_system_rejected() {
        let mut mat = SMatrix::<f64, 7, 7>::identity();
        let mut rhs = SVector::<f64, 7>::zeros();
        let mut pivots = [0usize; 7];

        let err = solve_in_place(&mut mat, &mut rhs, &mut pivots, &options()).unwrap_err();

        assert!(matches!(err, KernelError::SystemTooLarge { size: 7, max: 6 }));
        assert_eq!(mat, SMatrix::<f64, 7, 7>::identity());
    }

    #[test]
    fn test_determinant() {
        let a = Matrix2::new(3.0, 8.0, 4.0, 6.0);
        assert_abs_diff_eq!(determinant(&a, &options()).unwrap(), -14.0, epsilon = 1e-12);
    }
}
