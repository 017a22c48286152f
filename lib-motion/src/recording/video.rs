use std::{path::{Path, PathBuf}, sync::Arc};
use parking_lot::Mutex;

use crate::*;

/// Presentation time as a whole number of ticks on a timescale (ticks per second).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTime
{
    pub value: i64,
    pub timescale: i32,
}

impl MediaTime
{
    pub const ZERO: MediaTime = MediaTime { value: 0, timescale: VIDEO_TIME_SCALE };

    /// Converts seconds to the nearest tick on the given timescale.
    ///
    pub fn from_seconds(seconds: f64, timescale: i32) -> Self {
        MediaTime {
            value: (seconds * timescale as f64).round() as i64,
            timescale,
        }
    }

    pub fn seconds(&self) -> f64 {
        self.value as f64 / self.timescale as f64
    }
}

/// How the video track is set up on the writer.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInputSettings
{
    pub time_scale: i32,

    /// Frames come from a live camera, the writer should not hold them back for better encoding.
    pub expects_real_time: bool,

    /// Rotation (radians) stored as the track transform.
    pub rotation: f64,
}

impl Default for VideoInputSettings {
    fn default() -> Self {
        VideoInputSettings {
            time_scale: VIDEO_TIME_SCALE,
            expects_real_time: true,
            rotation: VIDEO_ROTATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterStatus
{
    Unknown,
    Writing,
    Completed,
    Failed,
}

pub type FinishCallback = Box<dyn FnOnce(WriterStatus) + Send>;

/// The video encoder / container writer the session drives. This is provided by the platform,
/// the session only relies on the contract below.
///
pub trait VideoWriter: Send + 'static
{
    type Frame;

    /// Adds the video track input, `false` when the writer refuses it.
    fn add_input(&mut self, settings: &VideoInputSettings) -> bool;

    /// `false` when the writer could not start.
    fn start_writing(&mut self) -> bool;

    fn start_session(&mut self, at: MediaTime);

    fn is_ready_for_more_media_data(&self) -> bool;

    /// `false` when the frame could not be appended.
    fn append(&mut self, frame: Self::Frame, at: MediaTime) -> bool;

    fn mark_as_finished(&mut self);

    /// Finalizes the container in the background. The writer keeps itself alive until it is
    /// done and then calls `completion`, possibly from another thread.
    fn finish_writing(self, completion: FinishCallback);

    fn status(&self) -> WriterStatus;
}

type WriterOpener<W> = Box<dyn FnMut(&Path) -> Result<W, MotionError> + Send>;

type VideoListener = Box<dyn FnMut(Result<PathBuf, MotionError>) + Send>;

struct ActiveRecording<W>
{
    writer: W,
    path: PathBuf,

    /// Sensor timestamp (seconds) of the first accepted frame, which becomes time zero.
    time_zero: Option<f64>,

    frames: usize,
}

enum VideoState<W>
{
    Idle,
    Recording(ActiveRecording<W>),
    Finalizing { path: PathBuf },
}

/// State shared with the finalize completion, which may run on the writer's own thread.
///
/// The lock belongs to this session alone, calls into the writer may be held up by the encoder
/// and must not stall the motion stream.
///
struct Shared<W>
{
    state: Mutex<VideoState<W>>,
    listener: Mutex<Option<VideoListener>>,
}

impl<W> Shared<W>
{
    fn finish(&self, path: PathBuf, status: WriterStatus) {
        {
            let mut state = self.state.lock();
            if matches!(*state, VideoState::Finalizing { .. }) {
                *state = VideoState::Idle;
            }
        }

        let result = match status {
            WriterStatus::Failed => {
                log::warn!("Finalizing {} failed", path.display());
                Err(MotionError::EncoderFailed(format!("could not finalize {}", path.display())))
            },
            _ => {
                log::info!("Saved {}", path.display());
                Ok(path)
            },
        };

        let listener = self.listener.lock().take();
        if let Some(mut listener) = listener {
            listener(result);
            let mut slot = self.listener.lock();
            if slot.is_none() {
                *slot = Some(listener);
            }
        }
    }
}

/// Records camera frames into a video container between `start` and `stop`.
///
/// The encoder paces the recording: frames arriving while it is not ready for more data are
/// dropped rather than queued. The first accepted frame is presented at time zero and every
/// later frame relative to it.
///
pub struct VideoRecordingSession<W: VideoWriter>
{
    config: RecordingConfig,
    settings: VideoInputSettings,
    opener: Mutex<WriterOpener<W>>,
    shared: Arc<Shared<W>>,
}

impl<W: VideoWriter> VideoRecordingSession<W>
{
    /// `opener` creates a fresh writer for the container at the given path every time a
    /// recording starts.
    ///
    pub fn new<F>(config: RecordingConfig, opener: F) -> Self
    where
        F: FnMut(&Path) -> Result<W, MotionError> + Send + 'static,
    {
        VideoRecordingSession {
            config,
            settings: VideoInputSettings::default(),
            opener: Mutex::new(Box::new(opener)),
            shared: Arc::new(Shared {
                state: Mutex::new(VideoState::Idle),
                listener: Mutex::new(None),
            }),
        }
    }

    pub fn settings(&self) -> &VideoInputSettings {
        &self.settings
    }

    /// Registers the single listener that receives the finished clip's path (or the reason it
    /// could not be finalized).
    ///
    pub fn set_listener<F>(&self, listener: F)
    where
        F: FnMut(Result<PathBuf, MotionError>) + Send + 'static,
    {
        self.shared.listener.lock().replace(Box::new(listener));
    }

    /// `true` from `start` until the container has been finalized.
    ///
    pub fn is_recording(&self) -> bool {
        !matches!(*self.shared.state.lock(), VideoState::Idle)
    }

    pub fn is_finalizing(&self) -> bool {
        matches!(*self.shared.state.lock(), VideoState::Finalizing { .. })
    }

    /// Number of frames appended to the current recording.
    ///
    pub fn recorded_frames(&self) -> usize {
        match &*self.shared.state.lock() {
            VideoState::Recording(recording) => recording.frames,
            _ => 0,
        }
    }

    pub fn start(&self) -> Result<Option<PathBuf>, MotionError> {
        self.start_with_stamp(&file_stamp_now())
    }

    /// Opens a new container and arms the writer. Returns the container path, or `None` when a
    /// recording is already running (or still finalizing).
    ///
    pub fn start_with_stamp(&self, stamp: &str) -> Result<Option<PathBuf>, MotionError> {
        let mut state = self.shared.state.lock();
        if !matches!(*state, VideoState::Idle) {
            return Ok(None);
        }

        let dir = self.config.output_dir();
        ensure_dir(dir)?;
        let path = ArtifactKind::Video.path_in(dir, stamp);

        let mut writer = (*self.opener.lock())(&path)?;
        if !writer.add_input(&self.settings) {
            return Err(MotionError::EncoderFailed("writer refused the video input".into()));
        }
        if !writer.start_writing() {
            return Err(MotionError::EncoderFailed("writer could not start writing".into()));
        }
        writer.start_session(MediaTime::ZERO);

        *state = VideoState::Recording(ActiveRecording {
            writer,
            path: path.clone(),
            time_zero: None,
            frames: 0,
        });
        drop(state);

        log::info!("Video recording started: {}", path.display());
        Ok(Some(path))
    }

    /// Appends a camera frame if the writer can take it. Returns whether the frame was
    /// recorded, dropped frames leave the time zero anchor untouched.
    ///
    pub fn record_frame(&self, frame: W::Frame, timestamp: f64) -> bool {
        let mut state = self.shared.state.lock();
        let VideoState::Recording(recording) = &mut *state else {
            return false;
        };

        if !recording.writer.is_ready_for_more_media_data() {
            log::trace!("Encoder busy, dropping frame at {}", timestamp);
            return false;
        }

        let time_zero = recording.time_zero.unwrap_or(timestamp);
        let at = MediaTime::from_seconds(timestamp - time_zero, self.settings.time_scale);
        if !recording.writer.append(frame, at) {
            log::warn!("Encoder rejected frame at {}", timestamp);
            return false;
        }

        recording.time_zero = Some(time_zero);
        recording.frames += 1;
        true
    }

    /// Finishes the recording. The container is finalized in the background and the listener
    /// is told once it is done.
    ///
    /// Returns `Ok(false)` when there is nothing to stop. While the writer is busy this returns
    /// `EncoderNotReady` and the caller has to try again, a failed writer gives `EncoderFailed`
    /// until the session is `reset`.
    ///
    pub fn stop(&self) -> Result<bool, MotionError> {
        let recording = {
            let mut state = self.shared.state.lock();
            match core::mem::replace(&mut *state, VideoState::Idle) {
                VideoState::Recording(recording) => {
                    let blocked = if recording.writer.status() == WriterStatus::Failed {
                        Some(MotionError::EncoderFailed("writer is in failed state".into()))
                    } else if !recording.writer.is_ready_for_more_media_data() {
                        Some(MotionError::EncoderNotReady)
                    } else {
                        None
                    };
                    match blocked {
                        Some(err) => {
                            *state = VideoState::Recording(recording);
                            Err(err)
                        },
                        None => {
                            *state = VideoState::Finalizing { path: recording.path.clone() };
                            Ok(Some(recording))
                        },
                    }
                },
                other => {
                    *state = other;
                    Ok(None)
                },
            }
        };

        let mut recording = match recording {
            Ok(Some(recording)) => recording,
            Ok(None) => return Ok(false),
            Err(err) => {
                log::debug!("Not stopping video recording: {}", err);
                return Err(err);
            },
        };

        log::info!("Video recording stopped after {} frames, finalizing", recording.frames);
        recording.writer.mark_as_finished();

        let shared = Arc::clone(&self.shared);
        let path = recording.path;
        recording.writer.finish_writing(Box::new(move |status| shared.finish(path, status)));
        Ok(true)
    }

    /// Abandons the current writer (e.g. after it failed) and goes back to idle. A container
    /// that is already being finalized cannot be cancelled, `false` is returned in that case.
    ///
    pub fn reset(&self) -> bool {
        let mut state = self.shared.state.lock();
        match core::mem::replace(&mut *state, VideoState::Idle) {
            VideoState::Finalizing { path } => {
                *state = VideoState::Finalizing { path };
                false
            },
            VideoState::Recording(recording) => {
                log::warn!("Discarding video recording {}", recording.path.display());
                true
            },
            VideoState::Idle => true,
        }
    }
}
