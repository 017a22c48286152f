use crate::*;

/// Orientation as a product of three rotations. Euler angles suffer from gimbal lock so all the
/// orientation math is done on matrices, but the angles are what gets logged next to them since
/// they are much easier to read for humans.
/// 
/// Yaw = rotation around Z-axis
/// Roll = rotation around X-axis
/// Pitch = rotation around Y-axis
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles
{
    pub yaw: f64,
    pub pitch: f64, 
    pub roll: f64,
}

impl EulerAngles
{
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        EulerAngles { yaw, pitch, roll }
    }

    /// Creates an all zeros euler angles instance, i.e. the identity/no rotation angles.
    /// 
    pub const fn identity() -> Self {
        EulerAngles { yaw: 0.0, pitch: 0.0, roll: 0.0 }
    }

    /// Approximate equality check with a given tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        approx_eq(self.yaw, other.yaw, tol)
            && approx_eq(self.pitch, other.pitch, tol)
            && approx_eq(self.roll, other.roll, tol)
    }
}

impl From<Quaternion> for EulerAngles {
    fn from(value: Quaternion) -> Self {
        EulerAngles::from(&value)
    }
}

impl From<&Quaternion> for EulerAngles {
    fn from(q: &Quaternion) -> Self {
        let ysqr = q.y * q.y;

        // Roll (x-axis rotation)
        let t0 = 2.0 * (q.w * q.x + q.y * q.z);
        let t1 = 1.0 - 2.0 * (q.x * q.x + ysqr);
        let roll = libm::atan2(t0, t1);

        // Pitch (y-axis rotation)
        let t2 = clamp_unit(2.0 * (q.w * q.y - q.z * q.x));
        let pitch = libm::asin(t2);

        // Gimbal lock, yaw and roll share an axis so we put everything into roll.
        if libm::fabs(t2) >= 0.999999 {
            let roll = libm::atan2(-2.0 * (q.y * q.z - q.w * q.x), 1.0 - 2.0 * (q.x * q.x + q.z * q.z));
            return EulerAngles::new(0.0, pitch, roll);
        }

        // Yaw (z-axis rotation)
        let t3 = 2.0 * (q.w * q.z + q.x * q.y);
        let t4 = 1.0 - 2.0 * (ysqr + q.z * q.z);
        let yaw = libm::atan2(t3, t4);

        EulerAngles::new(yaw, pitch, roll)
    }
}
