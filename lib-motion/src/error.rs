use core::{error::Error, fmt};
use std::{io, path::PathBuf};

use crate::Sensor;

/// Everything that can go wrong while tracking or recording. None of these are fatal for the
/// process, the caller decides whether to retry, restart the session or give up.
/// 
#[derive(Debug)]
pub enum MotionError
{
    /// The user refused access to the sensor; tracking for it does not start.
    PermissionDenied(Sensor),

    /// The sensor hardware is not present on this device.
    DeviceUnavailable(Sensor),

    /// An artifact could not be written, sibling artifacts of the same flush are unaffected.
    WriteFailure { path: PathBuf, cause: WriteCause },

    /// The encoder cannot take more data right now, the frame was dropped or the stop deferred.
    EncoderNotReady,

    /// The encoder entered its failed state (or refused to start), needs an external reset.
    EncoderFailed(String),
}

#[derive(Debug)]
pub enum WriteCause
{
    Io(io::Error),
    Csv(csv::Error),
}

impl MotionError
{
    pub fn write_failure(path: impl Into<PathBuf>, cause: impl Into<WriteCause>) -> Self {
        MotionError::WriteFailure { path: path.into(), cause: cause.into() }
    }
}

impl Error for MotionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailure { cause: WriteCause::Io(err), .. } => Some(err),
            Self::WriteFailure { cause: WriteCause::Csv(err), .. } => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PermissionDenied(sensor) => write!(f, "Access to the {} was denied", sensor),
            Self::DeviceUnavailable(sensor) => write!(f, "No {} available on this device", sensor),
            Self::WriteFailure { path, cause } => write!(f, "Failed to write {}: {}", path.display(), cause),
            Self::EncoderNotReady => write!(f, "Video encoder is not ready for more data"),
            Self::EncoderFailed(reason) => write!(f, "Video encoder failed: {}", reason),
        }
    }
}

impl fmt::Display for WriteCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{}", err),
            Self::Csv(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for WriteCause
{
    fn from(err: io::Error) -> Self {
        WriteCause::Io(err)
    }
}

impl From<csv::Error> for WriteCause
{
    fn from(err: csv::Error) -> Self {
        WriteCause::Csv(err)
    }
}
