use core::ops::{Div, Mul};

/// Three component vector, used for the per-axis sensor channels (acceleration, rotation rate,
/// gravity and magnetic field) as well as for rotating directions around.
///
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector
{
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vector { x, y, z }
    }
}

impl From<Vector> for [f64; 3] {
    fn from(v: Vector) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Vector
{
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector { x, y, z }
    }

    pub const fn zero() -> Self {
        Vector::new(0.0, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Unit vector in the same direction, the zero vector stays zero.
    ///
    pub fn normalize(&self) -> Vector {
        let len = self.magnitude();
        if len == 0.0 || len.is_nan() {
            return Vector::zero();
        }
        self / len
    }

    pub fn approx_eq(&self, other: &Vector, tol: f64) -> bool {
        approx_eq_all(&[self.x, self.y, self.z], &[other.x, other.y, other.z], tol)
    }
}

fn approx_eq_all(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.iter().zip(b).all(|(a, b)| crate::approx_eq(*a, *b, tol))
}

impl Div<f64> for &Vector
{
    type Output = Vector;

    fn div(self, divisor: f64) -> Self::Output {
        Vector::new(self.x / divisor, self.y / divisor, self.z / divisor)
    }
}

impl Div<f64> for Vector
{
    type Output = Vector;

    fn div(self, divisor: f64) -> Self::Output {
        &self / divisor
    }
}

impl Mul<f64> for Vector
{
    type Output = Vector;

    fn mul(self, factor: f64) -> Self::Output {
        Vector::new(self.x * factor, self.y * factor, self.z * factor)
    }
}
