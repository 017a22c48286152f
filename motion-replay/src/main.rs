use std::{env, error::Error, fs::File, path::Path};
use math::{EulerAngles, Matrix3, Vector, RAD_TO_DEG};
use ::motion::*;

/// Columns per input row after the header line: timestamp, rotation m11..m33, pitch, roll, yaw,
/// user acceleration, rotation rate, gravity and magnetic field.
static INPUT_COLUMNS: usize = 25;

fn parse_sample(record: &[f64]) -> Result<MotionSample, String> {
    if record.len() != INPUT_COLUMNS {
        return Err(format!("expected {} columns, got {}", INPUT_COLUMNS, record.len()));
    }
    let vector = |at: usize| Vector::new(record[at], record[at + 1], record[at + 2]);

    let rotation = Matrix3::from_rows([
        [record[1], record[2], record[3]],
        [record[4], record[5], record[6]],
        [record[7], record[8], record[9]],
    ]);
    let (pitch, roll, yaw) = (record[10], record[11], record[12]);

    Ok(MotionSample {
        attitude: Attitude::new(rotation, EulerAngles::new(yaw, pitch, roll)),
        user_acceleration: vector(13),
        rotation_rate: vector(16),
        gravity: vector(19),
        magnetic_field: vector(22),
        timestamp: record[0],
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("usage: motion-replay <samples.csv> [output-dir]\n\
            samples.csv starts with a header line, every following row holds 25 numbers".into());
    }
    let in_path = Path::new(&args[1]);
    let config = match args.get(2) {
        Some(dir) => RecordingConfig::new(dir),
        None => RecordingConfig::default(),
    };

    authorize_motion(true, AuthorizationStatus::Authorized)?;

    let tracker = OrientationTracker::new();
    let session = MotionRecordingSession::new(config);
    session.set_listener(|artifacts| {
        for artifact in artifacts {
            println!("{}", artifact.path.display());
        }
    });

    // Loop over every line in the input CSV, the first sample counts as the headphones
    // connecting and sets the reference frame.
    let mut reader = csv::Reader::from_reader(File::open(in_path)?);
    session.start();
    for (line, result) in reader.deserialize::<Vec<f64>>().enumerate() {
        let sample = parse_sample(&result?).map_err(|err| format!("row {}: {}", line + 1, err))?;
        if line == 0 {
            tracker.ingest(&sample.attitude.rotation);
            tracker.handle_event(MotionEvent::Connected);
        }

        let orientation = tracker.on_sample(&sample);
        session.record_sample(sample, orientation);
        log::trace!(
            "t={:.3} yaw={:.1} pitch={:.1} roll={:.1}",
            sample.timestamp,
            sample.attitude.angles.yaw * RAD_TO_DEG,
            sample.attitude.angles.pitch * RAD_TO_DEG,
            sample.attitude.angles.roll * RAD_TO_DEG,
        );
    }

    let Some(flush) = session.stop() else {
        return Ok(());
    };
    log::info!("Replayed {} samples", flush.sample_count);
    match flush.failures.into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
