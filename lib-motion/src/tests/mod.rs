use crate::*;

mod video_recording;

/// Sample with easily recognizable channel values, every channel offset by the timestamp.
/// 
pub fn sample_at(timestamp: f64) -> MotionSample {
    let q = Quaternion::from(EulerAngles::new(0.1 * timestamp, 0.2, -0.3));
    MotionSample {
        attitude: Attitude::from_quaternion(&q),
        user_acceleration: Vector::new(1.0, 2.0, 3.0) * timestamp,
        rotation_rate: Vector::new(4.0, 5.0, 6.0),
        gravity: Vector::new(0.0, 0.0, -1.0),
        magnetic_field: Vector::new(7.0, 8.0, 9.0),
        timestamp,
    }
}

/// Reads back a CSV artifact as rows of numbers.
/// 
pub fn read_rows(path: &std::path::Path) -> Vec<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .deserialize::<Vec<f64>>()
        .map(|row| row.unwrap())
        .collect()
}
