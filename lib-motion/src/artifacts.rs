use std::{fs::{self, OpenOptions}, io::{BufWriter, Write}, path::{Path, PathBuf}};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{config::FILE_STAMP_FORMAT, MotionError, MotionSample, CHANNEL_COUNT};
use math::Matrix3;

/// The files a recording produces.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind
{
    /// All 16 raw sensor channels.
    MotionDump,
    /// Rendered rotation matrix per sample.
    RotationTable,
    /// Yaw, pitch and roll per sample.
    AxesTable,
    /// The camera clip.
    Video,
}

impl ArtifactKind
{
    pub const fn file_prefix(&self) -> &'static str {
        match self {
            Self::MotionDump => "MotionData",
            Self::RotationTable => "RotationData",
            Self::AxesTable => "AxesData",
            Self::Video => "MotionVideo",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::MotionDump => "txt",
            Self::RotationTable | Self::AxesTable => "csv",
            Self::Video => "mov",
        }
    }

    /// Path of this artifact inside `dir` for the given file stamp.
    ///
    pub fn path_in(&self, dir: &Path, stamp: &str) -> PathBuf {
        dir.join(format!("{}-{}.{}", self.file_prefix(), stamp, self.extension()))
    }
}

/// A file that was written to disk.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact
{
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Formats the suffix shared by all files of one recording, `yyyyMMdd-HHmmss`.
///
pub fn file_stamp(time: &DateTime<Local>) -> String {
    time.format(FILE_STAMP_FORMAT).to_string()
}

pub fn file_stamp_now() -> String {
    file_stamp(&Local::now())
}

/// A recorded sample together with the orientation that was rendered for it at the time.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedSample
{
    pub sample: MotionSample,
    pub orientation: Matrix3,
}

#[derive(Serialize)]
struct RotationRow
{
    m11: f64, m12: f64, m13: f64,
    m21: f64, m22: f64, m23: f64,
    m31: f64, m32: f64, m33: f64,
    timestamp: f64,
}

impl From<&RecordedSample> for RotationRow {
    fn from(r: &RecordedSample) -> Self {
        let m = &r.orientation;
        RotationRow {
            m11: m.m11, m12: m.m12, m13: m.m13,
            m21: m.m21, m22: m.m22, m23: m.m23,
            m31: m.m31, m32: m.m32, m33: m.m33,
            timestamp: r.sample.timestamp,
        }
    }
}

#[derive(Serialize)]
struct AxesRow
{
    yaw: f64,
    pitch: f64,
    roll: f64,
    timestamp: f64,
}

impl From<&RecordedSample> for AxesRow {
    fn from(r: &RecordedSample) -> Self {
        let angles = r.sample.attitude.angles;
        AxesRow {
            yaw: angles.yaw,
            pitch: angles.pitch,
            roll: angles.roll,
            timestamp: r.sample.timestamp,
        }
    }
}

/// Writes the raw channels as one list per channel: `[[acc x...], [acc y...], ..., [time...]]`.
/// An existing file is never overwritten, that is reported as a write failure instead.
///
pub fn write_motion_dump(path: &Path, samples: &[RecordedSample]) -> Result<(), MotionError> {
    let mut channels: Vec<Vec<f64>> = vec![Vec::with_capacity(samples.len()); CHANNEL_COUNT];
    for recorded in samples {
        for (channel, value) in channels.iter_mut().zip(recorded.sample.channels()) {
            channel.push(value);
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| MotionError::write_failure(path, err))?;
    let mut writer = BufWriter::new(file);
    write!(writer, "{:?}", channels)
        .and_then(|_| writer.flush())
        .map_err(|err| MotionError::write_failure(path, err))
}

/// One line per sample: the nine rendered rotation entries (row-major) followed by the timestamp.
///
pub fn write_rotation_table(path: &Path, samples: &[RecordedSample]) -> Result<(), MotionError> {
    write_table(path, samples.iter().map(RotationRow::from))
}

/// One line per sample: yaw, pitch, roll and timestamp.
///
pub fn write_axes_table(path: &Path, samples: &[RecordedSample]) -> Result<(), MotionError> {
    write_table(path, samples.iter().map(AxesRow::from))
}

fn write_table<R: Serialize>(path: &Path, rows: impl Iterator<Item = R>) -> Result<(), MotionError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| MotionError::write_failure(path, err))?;
    for row in rows {
        writer.serialize(row).map_err(|err| MotionError::write_failure(path, err))?;
    }
    writer.flush().map_err(|err| MotionError::write_failure(path, err))
}

/// Makes sure the output directory exists before anything gets written into it.
///
pub fn ensure_dir(dir: &Path) -> Result<(), MotionError> {
    fs::create_dir_all(dir).map_err(|err| MotionError::write_failure(dir, err))
}
