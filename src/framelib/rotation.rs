//! 3x3 matrices for reference-frame rotations
//!
//! Every frame change in positional astronomy (precession, nutation, equatorial to
//! ecliptic or galactic) is a 3x3 rotation applied to a direction vector, and longer
//! chains are built by multiplying those matrices together. This module provides the
//! matrix type and the operations those chains are made of.
//!
//! # Storage Layout
//!
//! Elements are stored row-major as `[[T; 3]; 3]`; `m[(i, j)]` is row `i`, column `j`.
//! Products follow the textbook rule `c[i][j] = Σ_k a[i][k] · b[k][j]` and a matrix
//! acts on a column vector from the left. Swapping this convention would silently
//! transpose every derived rotation.
//!
//! # Rotation Convention
//!
//! Elementary rotations rotate the reference frame, not the vector: a positive
//! rotation about Z by 90° takes the vector `[1, 0, 0]` to `[0, -1, 0]`. An axial
//! vector (see [`Matrix3x3::from_axis_vector`]) rotates the frame clockwise as seen
//! looking along the vector from the origin.
//!
//! ```
//! use skykernel::coordinates::cartesian::Cartesian3;
//! use skykernel::framelib::rotation::Matrix3x3;
//! use std::f64::consts::PI;
//!
//! let m = Matrix3x3::from_euler("z", PI / 2.0, 0.0, 0.0);
//! let v = m.apply(&Cartesian3::new(1.0, 0.0, 0.0));
//! assert!(v.x.abs() < 1e-15);
//! assert!((v.y + 1.0).abs() < 1e-15);
//! ```

use crate::coordinates::cartesian::Cartesian3;
use crate::linalg::solver::{self, SolverOptions};
use crate::scalar::Real;
use crate::{KernelError, Result};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Mul, MulAssign};

/// Principal axis of an elementary rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Maps an axis label to its axis
    ///
    /// `'1'`, `'x'` and `'X'` all name the X axis; likewise `2/y/Y` and `3/z/Z`.
    pub fn from_char(label: char) -> Option<Axis> {
        match label {
            '1' | 'x' | 'X' => Some(Axis::X),
            '2' | 'y' | 'Y' => Some(Axis::Y),
            '3' | 'z' | 'Z' => Some(Axis::Z),
            _ => None,
        }
    }

    /// Parses an Euler order string, rejecting anything [`Matrix3x3::from_euler`]
    /// would silently skip
    ///
    /// The order must name one to three axes with no unrecognized characters.
    pub fn parse_order(order: &str) -> Result<Vec<Axis>> {
        let axes: Option<Vec<Axis>> = order.chars().map(Axis::from_char).collect();
        match axes {
            Some(axes) if !axes.is_empty() && axes.len() <= 3 => Ok(axes),
            _ => Err(KernelError::InvalidAxisOrder(order.to_string())),
        }
    }
}

/// 3x3 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3x3<T = f64> {
    elements: [[T; 3]; 3],
}

impl<T: Real> Default for Matrix3x3<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> Matrix3x3<T> {
    /// Creates a matrix from its rows
    pub fn from_rows(elements: [[T; 3]; 3]) -> Self {
        Matrix3x3 { elements }
    }

    pub fn identity() -> Self {
        let (o, l) = (T::zero(), T::one());
        Matrix3x3::from_rows([[l, o, o], [o, l, o], [o, o, l]])
    }

    pub fn zero() -> Self {
        Matrix3x3::from_rows([[T::zero(); 3]; 3])
    }

    /// Returns the rows as a nested array
    pub fn to_rows(&self) -> [[T; 3]; 3] {
        self.elements
    }

    /// Returns row `i` as a vector
    pub fn row(&self, i: usize) -> Cartesian3<T> {
        Cartesian3::from_array(self.elements[i])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.elements;
        Matrix3x3::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> T {
        let m = &self.elements;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes `self · other`
    ///
    /// # Examples
    ///
    /// ```
    /// use skykernel::framelib::rotation::Matrix3x3;
    ///
    /// let a = Matrix3x3::from_rows([[1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    /// assert_eq!(a.multiply(&Matrix3x3::identity()), a);
    /// ```
    pub fn multiply(&self, other: &Matrix3x3<T>) -> Matrix3x3<T> {
        let a = &self.elements;
        let b = &other.elements;

        // multiply into scratch matrix
        let mut result = [[T::zero(); 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, element) in row.iter_mut().enumerate() {
                *element = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Matrix3x3::from_rows(result)
    }

    /// Replaces `self` with `self · right`
    pub fn post_multiply_assign(&mut self, right: &Matrix3x3<T>) {
        let product = self.multiply(right);
        self.elements = product.elements;
    }

    /// Replaces `self` with `left · self`
    pub fn pre_multiply_assign(&mut self, left: &Matrix3x3<T>) {
        let product = left.multiply(self);
        self.elements = product.elements;
    }

    /// Computes `self · v`
    pub fn apply(&self, v: &Cartesian3<T>) -> Cartesian3<T> {
        Cartesian3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    /// Computes `selfᵀ · v` without forming the transpose
    ///
    /// For a rotation matrix this applies the inverse rotation.
    pub fn apply_transpose(&self, v: &Cartesian3<T>) -> Cartesian3<T> {
        let m = &self.elements;
        let mut out = Cartesian3::zero();
        for j in 0..3 {
            out[j] = m[0][j] * v.x + m[1][j] * v.y + m[2][j] * v.z;
        }
        out
    }

    /// Elementary frame rotation about a principal axis
    pub fn rotation(axis: Axis, angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (T::zero(), T::one());
        let rows = match axis {
            Axis::X => [[l, o, o], [o, c, s], [o, -s, c]],
            Axis::Y => [[c, o, -s], [o, l, o], [s, o, c]],
            Axis::Z => [[c, s, o], [-s, c, o], [o, o, l]],
        };
        Matrix3x3::from_rows(rows)
    }

    pub fn rotation_x(angle: T) -> Self {
        Self::rotation(Axis::X, angle)
    }

    pub fn rotation_y(angle: T) -> Self {
        Self::rotation(Axis::Y, angle)
    }

    pub fn rotation_z(angle: T) -> Self {
        Self::rotation(Axis::Z, angle)
    }

    /// Builds a rotation matrix from up to three successive elementary rotations
    ///
    /// The first three characters of `order` pick the axis for `phi`, `theta` and
    /// `psi` respectively. Axis labels are `1`/`2`/`3` or `x`/`y`/`z` in either case.
    /// An unrecognized character is skipped and its angle unused; later characters
    /// still apply, so `"z?x"` rotates about z by `phi` and then about x by `psi`.
    /// Each rotation is applied to the frame produced by the previous ones, i.e.
    /// `result = R(psi) · R(theta) · R(phi)`. An empty or fully invalid order gives
    /// the identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use skykernel::coordinates::cartesian::Cartesian3;
    /// use skykernel::framelib::rotation::Matrix3x3;
    /// use std::f64::consts::PI;
    ///
    /// // Rotating about Z leaves the Z axis where it was
    /// let m = Matrix3x3::from_euler("ZYZ", PI / 2.0, 0.0, 0.0);
    /// let pole = Cartesian3::new(0.0, 0.0, 1.0);
    /// assert_eq!(m.apply(&pole), pole);
    /// ```
    pub fn from_euler(order: &str, phi: T, theta: T, psi: T) -> Self {
        let mut result = Self::identity();
        for (label, angle) in order.chars().take(3).zip([phi, theta, psi]) {
            match Axis::from_char(label) {
                Some(axis) => result.pre_multiply_assign(&Self::rotation(axis, angle)),
                None => log::trace!("skipping unrecognized Euler axis {:?}", label),
            }
        }
        result
    }

    /// Forms the rotation matrix for an axial vector
    ///
    /// The vector's direction is the rotation axis and its modulus the rotation
    /// angle in radians. The zero vector gives the identity.
    pub fn from_axis_vector(axis: &Cartesian3<T>) -> Self {
        let (unit, phi) = axis.normalize();
        let (s, c) = phi.sin_cos();
        let w = T::one() - c;
        let (x, y, z) = (unit.x, unit.y, unit.z);

        Matrix3x3::from_rows([
            [x * x * w + c, x * y * w + z * s, x * z * w - y * s],
            [x * y * w - z * s, y * y * w + c, y * z * w + x * s],
            [x * z * w + y * s, y * z * w - x * s, z * z * w + c],
        ])
    }

    /// Recovers the axial vector of a rotation matrix
    ///
    /// Exact inverse of [`Matrix3x3::from_axis_vector`] for proper rotations with
    /// an angle in (0, π). A matrix with no antisymmetric part, such as the identity,
    /// gives the zero vector. Near a half-turn the axis is poorly determined.
    pub fn to_axis_vector(&self) -> Cartesian3<T> {
        let m = &self.elements;
        let x = m[1][2] - m[2][1];
        let y = m[2][0] - m[0][2];
        let z = m[0][1] - m[1][0];
        let s2 = (x * x + y * y + z * z).sqrt();
        if s2 == T::zero() {
            return Cartesian3::zero();
        }

        let two = T::one() + T::one();
        let c2 = m[0][0] + m[1][1] + m[2][2] - T::one();
        let phi = (s2 / two).atan2(c2 / two);
        Cartesian3::new(x, y, z) * (phi / s2)
    }

    /// General inverse through the Gauss-Jordan solver
    ///
    /// For rotation matrices prefer [`Matrix3x3::transpose`].
    pub fn try_inverse(&self) -> Result<Matrix3x3<T>> {
        let mut m = self.to_matrix3();
        let mut rhs = Vector3::zeros();
        let mut pivots = [0usize; 3];
        solver::solve_in_place(&mut m, &mut rhs, &mut pivots, &SolverOptions::default())?;
        Ok(Matrix3x3::from_matrix3(&m))
    }

    /// Converts to a nalgebra Matrix3
    pub fn to_matrix3(&self) -> Matrix3<T> {
        Matrix3::from_fn(|i, j| self.elements[i][j])
    }

    /// Creates from a nalgebra Matrix3
    pub fn from_matrix3(m: &Matrix3<T>) -> Self {
        let mut elements = [[T::zero(); 3]; 3];
        for (i, row) in elements.iter_mut().enumerate() {
            for (j, element) in row.iter_mut().enumerate() {
                *element = m[(i, j)];
            }
        }
        Matrix3x3 { elements }
    }
}

impl<T> Index<(usize, usize)> for Matrix3x3<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.elements[row][col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix3x3<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.elements[row][col]
    }
}

impl<T: Real> Mul for Matrix3x3<T> {
    type Output = Matrix3x3<T>;

    fn mul(self, other: Matrix3x3<T>) -> Matrix3x3<T> {
        self.multiply(&other)
    }
}

impl<T: Real> MulAssign for Matrix3x3<T> {
    fn mul_assign(&mut self, other: Matrix3x3<T>) {
        self.post_multiply_assign(&other);
    }
}

impl<T: Real> Mul<Cartesian3<T>> for Matrix3x3<T> {
    type Output = Cartesian3<T>;

    fn mul(self, v: Cartesian3<T>) -> Cartesian3<T> {
        self.apply(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &Matrix3x3, b: &Matrix3x3, tol: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a[(i, j)], b[(i, j)], epsilon = tol);
            }
        }
    }

    fn sample(seed: f64) -> Matrix3x3 {
        Matrix3x3::from_rows([
            [seed, 2.0, -1.0],
            [0.5, seed * seed, 3.0],
            [-2.0, 1.5, 1.0 / seed],
        ])
    }

    #[test]
    fn test_row_major_indexing() {
        let m = Matrix3x3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(2, 2)], 9.0);
    }

    #[test]
    fn test_multiply_known_product() {
        let a = Matrix3x3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let b = Matrix3x3::from_rows([[9.0, 8.0, 7.0], [6.0, 5.0, 4.0], [3.0, 2.0, 1.0]]);
        let expected =
            Matrix3x3::from_rows([[30.0, 24.0, 18.0], [84.0, 69.0, 54.0], [138.0, 114.0, 90.0]]);
        assert_eq!(a.multiply(&b), expected);
        assert_eq!(a * b, expected);
    }

    #[test]
    fn test_multiply_identity() {
        let a = sample(1.3);
        assert_eq!(a.multiply(&Matrix3x3::identity()), a);
        assert_eq!(Matrix3x3::identity().multiply(&a), a);
    }

    #[test]
    fn test_multiply_associative() {
        let (a, b, c) = (sample(1.3), sample(-0.7), sample(2.1));
        let left = a.multiply(&b).multiply(&c);
        let right = a.multiply(&b.multiply(&c));
        assert_matrix_eq(&left, &right, 1e-12);
    }

    #[test]
    fn test_in_place_products_write_back() {
        let (a, b) = (sample(1.3), sample(-0.7));

        let mut post = a;
        post.post_multiply_assign(&b);
        assert_eq!(post, a.multiply(&b));

        let mut pre = b;
        pre.pre_multiply_assign(&a);
        assert_eq!(pre, a.multiply(&b));

        let mut squared = a;
        squared *= a;
        assert_eq!(squared, a.multiply(&a));
    }

    #[test]
    fn test_apply_and_apply_transpose() {
        let m = sample(0.9);
        let v = Cartesian3::new(0.3, -1.2, 2.0);

        let forward = m.apply(&v);
        let via_transpose = m.transpose().apply_transpose(&v);
        assert_eq!(forward, via_transpose);
        assert_eq!(m * v, forward);

        let backward = m.apply_transpose(&v);
        let expected = m.transpose().apply(&v);
        assert_eq!(backward, expected);
    }

    #[test]
    fn test_rotation_inverse_is_transpose() {
        let m = Matrix3x3::from_euler("zxz", 0.4, -1.1, 2.5);
        let v = Cartesian3::new(0.1, 0.7, -0.2);
        let back = m.apply_transpose(&m.apply(&v));
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-15);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-15);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-15);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_elementary_rotations_rotate_the_frame() {
        let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
        let v = Matrix3x3::rotation_z(PI / 2.0).apply(&x_axis);
        assert_abs_diff_eq!(v.y, -1.0, epsilon = 1e-15);

        let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
        let v = Matrix3x3::rotation_x(PI / 2.0).apply(&y_axis);
        assert_abs_diff_eq!(v.z, -1.0, epsilon = 1e-15);

        let z_axis = Cartesian3::new(0.0, 0.0, 1.0);
        let v = Matrix3x3::rotation_y(PI / 2.0).apply(&z_axis);
        assert_abs_diff_eq!(v.x, -1.0, epsilon = 1e-15);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("?!.")]
    fn test_euler_invalid_order_is_identity(#[case] order: &str) {
        assert_eq!(Matrix3x3::from_euler(order, 0.3, 0.2, 0.1), Matrix3x3::identity());
    }

    #[rstest]
    #[case("ZXZ")]
    #[case("zxz")]
    #[case("313")]
    #[case("3xZ")]
    fn test_euler_axis_aliases(#[case] order: &str) {
        let reference = Matrix3x3::from_euler("ZXZ", 0.3, 0.2, 0.1);
        assert_eq!(Matrix3x3::from_euler(order, 0.3, 0.2, 0.1), reference);
    }

    #[test]
    fn test_euler_composition_order() {
        let (phi, theta, psi) = (0.3, -0.8, 1.4);
        let expected = Matrix3x3::rotation_y(psi)
            * (Matrix3x3::rotation_x(theta) * Matrix3x3::rotation_z(phi));
        assert_eq!(Matrix3x3::from_euler("zxy", phi, theta, psi), expected);
    }

    #[test]
    fn test_euler_skips_unrecognized_characters() {
        // The '?' consumes theta without rotating
        let m = Matrix3x3::from_euler("z?x", 0.3, 9.0, 0.5);
        let expected = Matrix3x3::rotation_x(0.5) * Matrix3x3::rotation_z(0.3);
        assert_eq!(m, expected);

        // Rotation about x still follows the skipped character
        assert_ne!(m, Matrix3x3::from_euler("z", 0.3, 9.0, 0.5));
        assert_eq!(Matrix3x3::from_euler("?x", 9.0, 0.5, 0.0), Matrix3x3::rotation_x(0.5));
    }

    #[test]
    fn test_euler_ignores_characters_after_third() {
        let m = Matrix3x3::from_euler("zxzyyy", 0.3, 0.2, 0.1);
        assert_eq!(m, Matrix3x3::from_euler("zxz", 0.3, 0.2, 0.1));
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(Axis::parse_order("zXz").unwrap(), vec![Axis::Z, Axis::X, Axis::Z]);
        assert_eq!(Axis::parse_order("2").unwrap(), vec![Axis::Y]);
        assert!(matches!(Axis::parse_order(""), Err(KernelError::InvalidAxisOrder(_))));
        assert!(matches!(Axis::parse_order("zxzx"), Err(KernelError::InvalidAxisOrder(_))));
        assert!(matches!(Axis::parse_order("z?z"), Err(KernelError::InvalidAxisOrder(_))));
    }

    #[test]
    fn test_zero_axis_vector_is_identity() {
        let m: Matrix3x3 = Matrix3x3::from_axis_vector(&Cartesian3::zero());
        assert_eq!(m, Matrix3x3::identity());
    }

    #[test]
    fn test_axis_vector_about_z_matches_elementary_rotation() {
        let m = Matrix3x3::from_axis_vector(&Cartesian3::new(0.0, 0.0, 0.7));
        assert_matrix_eq(&m, &Matrix3x3::rotation_z(0.7), 1e-15);
    }

    #[rstest]
    #[case([0.0, 0.0, 0.5])]
    #[case([0.3, -0.2, 0.1])]
    #[case([-1.0, 1.5, 2.0])]
    #[case([1e-6, 0.0, 0.0])]
    fn test_axis_vector_round_trip(#[case] components: [f64; 3]) {
        let axis = Cartesian3::from(components);
        let back = Matrix3x3::from_axis_vector(&axis).to_axis_vector();
        assert_abs_diff_eq!(back.x, axis.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, axis.y, epsilon = 1e-12);
        assert_abs_diff_eq!(back.z, axis.z, epsilon = 1e-12);
    }

    #[test]
    fn test_identity_has_zero_axis_vector() {
        let axis: Cartesian3 = Matrix3x3::identity().to_axis_vector();
        assert_eq!(axis, Cartesian3::zero());
    }

    #[test]
    fn test_single_precision_rotation() {
        let m = Matrix3x3::<f32>::from_euler("x", std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let v = m.apply(&Cartesian3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(v.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_determinant() {
        let m = Matrix3x3::from_rows([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]]);
        assert_eq!(m.determinant(), 24.0);
        assert_eq!(Matrix3x3::<f64>::zero().determinant(), 0.0);
    }

    #[test]
    fn test_try_inverse() {
        let m = sample(1.7);
        let inv = m.try_inverse().unwrap();
        assert_matrix_eq(&m.multiply(&inv), &Matrix3x3::identity(), 1e-12);

        let singular = Matrix3x3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert!(matches!(singular.try_inverse(), Err(KernelError::SingularMatrix { .. })));
    }

    #[test]
    fn test_matrix3_conversions() {
        let m = sample(0.4);
        let na = m.to_matrix3();
        assert_eq!(na[(0, 1)], m[(0, 1)]);
        assert_eq!(na[(2, 0)], m[(2, 0)]);
        assert_eq!(Matrix3x3::from_matrix3(&na), m);
    }
}
