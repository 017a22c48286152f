use core::ops::Mul;
use crate::*;

/// Unit quaternion attitude, as reported by sensors that deliver their orientation in quaternion
/// form rather than as a rotation matrix.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion
{
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<[f64; 4]> for Quaternion {
    fn from([w, x, y, z]: [f64; 4]) -> Self {
        Quaternion { w, x, y, z }
    }
}

impl Quaternion
{
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion { w, x, y, z }
    }

    /// No rotation.
    ///
    pub const fn identity() -> Self {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians around the given axis. The axis does not need to be
    /// normalized, a zero axis gives the identity.
    ///
    pub fn from_axis_angle(axis: &Vector, angle: f64) -> Self {
        let axis = axis.normalize();
        let (s, c) = (libm::sin(angle / 2.0), libm::cos(angle / 2.0));
        Quaternion::new(c, axis.x * s, axis.y * s, axis.z * s).normalize()
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Scales to unit length. A zero quaternion is returned unchanged.
    ///
    pub fn normalize(&self) -> Quaternion {
        let n = self.magnitude();
        if n == 0.0 {
            return *self;
        }
        Quaternion::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    pub fn approx_eq(&self, other: &Quaternion, tol: f64) -> bool {
        approx_eq(self.w, other.w, tol)
            && approx_eq(self.x, other.x, tol)
            && approx_eq(self.y, other.y, tol)
            && approx_eq(self.z, other.z, tol)
    }

    /// Hamilton product, `self` applied after `other`.
    ///
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        let (a, b) = (self, other);
        Quaternion {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;
    fn mul(self, other: Quaternion) -> Self::Output {
        self.multiply(&other)
    }
}

/// Z-Y-X (yaw, then pitch, then roll) composition.
///
impl From<&EulerAngles> for Quaternion {
    fn from(a: &EulerAngles) -> Self {
        let (sy, cy) = (libm::sin(a.yaw / 2.0), libm::cos(a.yaw / 2.0));
        let (sp, cp) = (libm::sin(a.pitch / 2.0), libm::cos(a.pitch / 2.0));
        let (sr, cr) = (libm::sin(a.roll / 2.0), libm::cos(a.roll / 2.0));

        Quaternion {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }
}

impl From<EulerAngles> for Quaternion {
    fn from(angles: EulerAngles) -> Self {
        Quaternion::from(&angles)
    }
}
