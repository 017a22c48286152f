use math::{EulerAngles, Matrix3, Quaternion, Vector};

/// Number of values every sample contributes to the raw motion dump.
/// 
pub const CHANNEL_COUNT: usize = 16;

/// Orientation of the headphones as reported by the motion sensor, both as a rotation matrix
/// (what the orientation math runs on) and as yaw/pitch/roll (what gets logged).
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude
{
    pub rotation: Matrix3,
    pub angles: EulerAngles,
}

impl Attitude
{
    pub const fn new(rotation: Matrix3, angles: EulerAngles) -> Self {
        Attitude { rotation, angles }
    }

    /// Builds the attitude for sources that report a quaternion instead of a matrix.
    /// 
    pub fn from_quaternion(q: &Quaternion) -> Self {
        Attitude {
            rotation: Matrix3::from(q),
            angles: EulerAngles::from(q),
        }
    }
}

impl Default for Attitude {
    fn default() -> Self {
        Attitude::new(Matrix3::identity(), EulerAngles::identity())
    }
}

/// One reading of the headphone motion sensor. Samples are never modified after they have been
/// captured.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample
{
    pub attitude: Attitude,

    /// In g; acceleration the user imparts on the device, i.e. without gravity.
    pub user_acceleration: Vector,

    /// In rad/s.
    pub rotation_rate: Vector,

    /// In g; gravity in the device frame.
    pub gravity: Vector,

    /// In microtesla.
    pub magnetic_field: Vector,

    /// In seconds; monotonic sensor clock.
    pub timestamp: f64,
}

impl MotionSample
{
    /// The raw channel values in dump order: acceleration (x, y, z), attitude (pitch, roll, yaw),
    /// rotation rate (x, y, z), gravity (x, y, z), magnetic field (x, y, z) and the timestamp.
    /// 
    pub fn channels(&self) -> [f64; CHANNEL_COUNT] {
        let acc = self.user_acceleration;
        let angles = self.attitude.angles;
        let rate = self.rotation_rate;
        let gravity = self.gravity;
        let field = self.magnetic_field;
        [
            acc.x, acc.y, acc.z,
            angles.pitch, angles.roll, angles.yaw,
            rate.x, rate.y, rate.z,
            gravity.x, gravity.y, gravity.z,
            field.x, field.y, field.z,
            self.timestamp,
        ]
    }
}
