use core::ops::Mul;
use crate::*;

/// 3x3 matrix with its entries named after their row and column, `m12` being the entry on the
/// first row and second column. This is the same layout motion sensors report their attitude
/// rotation matrix in, which keeps the axis remapping code readable.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3
{
    pub m11: f64, pub m12: f64, pub m13: f64,
    pub m21: f64, pub m22: f64, pub m23: f64,
    pub m31: f64, pub m32: f64, pub m33: f64,
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Matrix3::from_rows(rows)
    }
}

impl Matrix3
{
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Matrix3 {
            m11: rows[0][0], m12: rows[0][1], m13: rows[0][2],
            m21: rows[1][0], m22: rows[1][1], m23: rows[1][2],
            m31: rows[2][0], m32: rows[2][1], m33: rows[2][2],
        }
    }

    /// Returns the identity matrix (no rotation)
    ///
    pub const fn identity() -> Self {
        Matrix3::diagonal(1.0, 1.0, 1.0)
    }

    /// Creates a matrix with the given values on its diagonal and zeros everywhere else.
    ///
    pub const fn diagonal(a: f64, b: f64, c: f64) -> Self {
        Matrix3::from_rows([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c],
        ])
    }

    pub const fn rows(&self) -> [[f64; 3]; 3] {
        [
            [self.m11, self.m12, self.m13],
            [self.m21, self.m22, self.m23],
            [self.m31, self.m32, self.m33],
        ]
    }

    /// All nine entries in row-major order, i.e. `m11, m12, m13, m21, ..., m33`.
    ///
    pub const fn to_row_major(&self) -> [f64; 9] {
        [
            self.m11, self.m12, self.m13,
            self.m21, self.m22, self.m23,
            self.m31, self.m32, self.m33,
        ]
    }

    pub const fn transpose(&self) -> Self {
        Matrix3 {
            m11: self.m11, m12: self.m21, m13: self.m31,
            m21: self.m12, m22: self.m22, m23: self.m32,
            m31: self.m13, m32: self.m23, m33: self.m33,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * (self.m22 * self.m33 - self.m23 * self.m32)
            - self.m12 * (self.m21 * self.m33 - self.m23 * self.m31)
            + self.m13 * (self.m21 * self.m32 - self.m22 * self.m31)
    }

    /// Matrix multiplication, `self * other`.
    ///
    pub fn multiply(&self, other: &Matrix3) -> Matrix3 {
        let a = self.rows();
        let b = other.rows();
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Matrix3::from_rows(out)
    }

    /// Applies the matrix to a column vector.
    ///
    pub fn transform(&self, v: &Vector) -> Vector {
        Vector {
            x: self.m11 * v.x + self.m12 * v.y + self.m13 * v.z,
            y: self.m21 * v.x + self.m22 * v.y + self.m23 * v.z,
            z: self.m31 * v.x + self.m32 * v.y + self.m33 * v.z,
        }
    }

    /// Checks whether the rows form an orthonormal basis, in which case the inverse of the matrix
    /// is simply its transpose. Note that this holds for reflections (determinant -1) too.
    ///
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        self.multiply(&self.transpose()).approx_eq(&Matrix3::identity(), tol)
    }

    /// Approximate equality check with a given tolerance.
    ///
    pub fn approx_eq(&self, other: &Matrix3, tol: f64) -> bool {
        self.to_row_major()
            .iter()
            .zip(other.to_row_major().iter())
            .all(|(a, b)| approx_eq(*a, *b, tol))
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::identity()
    }
}

impl Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;
    fn mul(self, other: Matrix3) -> Self::Output {
        self.multiply(&other)
    }
}
impl Mul<&Matrix3> for &Matrix3 {
    type Output = Matrix3;
    fn mul(self, other: &Matrix3) -> Self::Output {
        self.multiply(other)
    }
}

impl From<&Quaternion> for Matrix3 {
    fn from(q: &Quaternion) -> Self {
        let q = q.normalize();
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);

        Matrix3::from_rows([
            [1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - w * z), 2.0 * (x * z + w * y)],
            [2.0 * (x * y + w * z), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - w * x)],
            [2.0 * (x * z - w * y), 2.0 * (y * z + w * x), 1.0 - 2.0 * (x * x + y * y)],
        ])
    }
}

impl From<Quaternion> for Matrix3 {
    fn from(q: Quaternion) -> Self {
        Matrix3::from(&q)
    }
}
