use core::cell::RefCell;
use std::path::Path;
use critical_section::Mutex;
use math::Matrix3;

use crate::*;

type ArtifactsListener = Box<dyn FnMut(&[Artifact]) + Send>;

type ArtifactWriter = fn(&Path, &[RecordedSample]) -> Result<(), MotionError>;

enum SessionState
{
    Idle,
    Active(Vec<RecordedSample>),
}

/// Result of stopping an active motion recording.
///
#[derive(Debug)]
pub struct Flush
{
    /// File stamp shared by all artifacts of this recording.
    pub stamp: String,

    /// Number of samples that were recorded.
    pub sample_count: usize,

    /// Files that were written successfully.
    pub artifacts: Vec<Artifact>,

    /// Files that could not be written. Already written siblings are left on disk.
    pub failures: Vec<MotionError>,
}

impl Flush
{
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn path_of(&self, kind: ArtifactKind) -> Option<&Path> {
        self.artifacts.iter().find(|a| a.kind == kind).map(|a| a.path.as_path())
    }
}

/// Buffers motion samples between `start` and `stop` and writes them out as the motion dump,
/// rotation table and axes table once the recording stops.
///
/// Only samples recorded while the session is active end up in the files, the state check and
/// the append happen under the same lock as the hand-off of the buffer on stop.
///
pub struct MotionRecordingSession
{
    config: RecordingConfig,
    state: Mutex<RefCell<SessionState>>,
    listener: Mutex<RefCell<Option<ArtifactsListener>>>,
}

impl MotionRecordingSession
{
    pub fn new(config: RecordingConfig) -> Self {
        MotionRecordingSession {
            config,
            state: Mutex::new(RefCell::new(SessionState::Idle)),
            listener: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    /// Registers the single listener that is told about the files produced by `stop`.
    ///
    pub fn set_listener<F>(&self, listener: F)
    where
        F: FnMut(&[Artifact]) + Send + 'static,
    {
        critical_section::with(|cs| {
            self.listener.borrow_ref_mut(cs).replace(Box::new(listener));
        });
    }

    pub fn is_recording(&self) -> bool {
        critical_section::with(|cs| matches!(*self.state.borrow_ref(cs), SessionState::Active(_)))
    }

    /// Number of samples buffered so far, zero while idle.
    ///
    pub fn buffered(&self) -> usize {
        critical_section::with(|cs| match &*self.state.borrow_ref(cs) {
            SessionState::Active(samples) => samples.len(),
            SessionState::Idle => 0,
        })
    }

    /// Starts a new recording with an empty buffer. Returns `false` and leaves the current
    /// buffer alone if a recording is already running.
    ///
    pub fn start(&self) -> bool {
        let started = critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if matches!(*state, SessionState::Active(_)) {
                return false;
            }
            *state = SessionState::Active(Vec::new());
            true
        });

        if started {
            log::info!("Motion recording started");
        }
        started
    }

    /// Appends a sample and the orientation rendered for it. Samples arriving while idle are
    /// dropped, in which case `false` is returned.
    ///
    pub fn record_sample(&self, sample: MotionSample, orientation: Matrix3) -> bool {
        critical_section::with(|cs| match &mut *self.state.borrow_ref_mut(cs) {
            SessionState::Active(samples) => {
                samples.push(RecordedSample { sample, orientation });
                true
            },
            SessionState::Idle => false,
        })
    }

    /// Stops the recording and writes its artifacts, stamped with the current local time.
    /// Returns `None` (and writes nothing) when no recording was running.
    ///
    pub fn stop(&self) -> Option<Flush> {
        self.stop_with_stamp(&file_stamp_now())
    }

    /// Same as `stop` but with an explicit file stamp, e.g. to share it with a video recording.
    ///
    pub fn stop_with_stamp(&self, stamp: &str) -> Option<Flush> {
        let samples = critical_section::with(|cs| {
            match core::mem::replace(&mut *self.state.borrow_ref_mut(cs), SessionState::Idle) {
                SessionState::Active(samples) => Some(samples),
                SessionState::Idle => None,
            }
        })?;

        log::info!("Motion recording stopped with {} samples", samples.len());
        let flush = self.flush(stamp, &samples);

        if !flush.artifacts.is_empty() {
            let listener = critical_section::with(|cs| self.listener.borrow_ref_mut(cs).take());
            if let Some(mut listener) = listener {
                listener(&flush.artifacts);
                critical_section::with(|cs| {
                    let mut slot = self.listener.borrow_ref_mut(cs);
                    if slot.is_none() {
                        *slot = Some(listener);
                    }
                });
            }
        }
        Some(flush)
    }

    fn flush(&self, stamp: &str, samples: &[RecordedSample]) -> Flush {
        let mut flush = Flush {
            stamp: stamp.to_string(),
            sample_count: samples.len(),
            artifacts: Vec::with_capacity(3),
            failures: Vec::new(),
        };

        let dir = self.config.output_dir();
        if let Err(err) = ensure_dir(dir) {
            log::warn!("{}", err);
            flush.failures.push(err);
            return flush;
        }

        let writers = [
            (ArtifactKind::MotionDump, write_motion_dump as ArtifactWriter),
            (ArtifactKind::RotationTable, write_rotation_table as ArtifactWriter),
            (ArtifactKind::AxesTable, write_axes_table as ArtifactWriter),
        ];

        // Every file is attempted, a failing one does not stop (or roll back) the others.
        for (kind, write) in writers {
            let path = kind.path_in(dir, stamp);
            match write(&path, samples) {
                Ok(()) => {
                    log::info!("Saved {}", path.display());
                    flush.artifacts.push(Artifact { kind, path });
                },
                Err(err) => {
                    log::warn!("{}", err);
                    flush.failures.push(err);
                },
            }
        }
        flush
    }
}

impl Default for MotionRecordingSession {
    fn default() -> Self {
        Self::new(RecordingConfig::default())
    }
}
