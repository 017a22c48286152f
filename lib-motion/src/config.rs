use core::f64::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

/// Directory recordings end up in when no other directory is configured.
/// 
pub static RESULTS_DIR: &str = "recordings";

/// Timestamp suffix shared by all artifacts of one recording, `yyyyMMdd-HHmmss`.
/// 
pub static FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Ticks per second of the presentation timestamps handed to the video encoder.
/// 
pub const VIDEO_TIME_SCALE: i32 = 600;

/// The front camera delivers its frames rotated, the video track gets this rotation (radians)
/// applied so that players show the clip upright.
/// 
pub const VIDEO_ROTATION: f64 = FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct RecordingConfig
{
    /// Where the motion tables and video containers are written to, created when missing.
    pub output_dir: PathBuf,
}

impl RecordingConfig
{
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        RecordingConfig { output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        RecordingConfig::new(RESULTS_DIR)
    }
}
