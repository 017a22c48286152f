use std::{path::{Path, PathBuf}, sync::{atomic::{AtomicBool, AtomicU64, Ordering}, Arc, Mutex}, thread, time::{Duration, Instant}};
use tempfile::TempDir;

use crate::*;

/// What the fake writer saw, shared with the test.
///
#[derive(Default)]
struct WriterLog
{
    opened: Vec<PathBuf>,
    inputs: Vec<VideoInputSettings>,
    session_start: Option<MediaTime>,
    appended: Vec<(u32, MediaTime)>,
    marked_finished: bool,
    pending_finish: Option<FinishCallback>,
}

#[derive(Clone, Default)]
struct Controls
{
    busy: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    /// Make `append` refuse the frame.
    reject: Arc<AtomicBool>,
    /// Milliseconds `append` blocks for, like an encoder catching up.
    append_delay_ms: Arc<AtomicU64>,
    /// Set once `append` has been entered.
    appending: Arc<AtomicBool>,
    /// Hold on to the finish completion instead of calling it right away.
    defer_finish: Arc<AtomicBool>,
    log: Arc<Mutex<WriterLog>>,
}

struct FakeWriter
{
    controls: Controls,
}

impl VideoWriter for FakeWriter
{
    type Frame = u32;

    fn add_input(&mut self, settings: &VideoInputSettings) -> bool {
        self.controls.log.lock().unwrap().inputs.push(*settings);
        true
    }

    fn start_writing(&mut self) -> bool {
        true
    }

    fn start_session(&mut self, at: MediaTime) {
        self.controls.log.lock().unwrap().session_start = Some(at);
    }

    fn is_ready_for_more_media_data(&self) -> bool {
        !self.controls.busy.load(Ordering::SeqCst)
    }

    fn append(&mut self, frame: u32, at: MediaTime) -> bool {
        self.controls.appending.store(true, Ordering::SeqCst);
        let delay = self.controls.append_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
        if self.controls.reject.load(Ordering::SeqCst) {
            return false;
        }
        self.controls.log.lock().unwrap().appended.push((frame, at));
        true
    }

    fn mark_as_finished(&mut self) {
        self.controls.log.lock().unwrap().marked_finished = true;
    }

    fn finish_writing(self, completion: FinishCallback) {
        if self.controls.defer_finish.load(Ordering::SeqCst) {
            self.controls.log.lock().unwrap().pending_finish = Some(completion);
        } else {
            completion(WriterStatus::Completed);
        }
    }

    fn status(&self) -> WriterStatus {
        if self.controls.failed.load(Ordering::SeqCst) {
            WriterStatus::Failed
        } else {
            WriterStatus::Writing
        }
    }
}

type Finished = Arc<Mutex<Vec<Result<PathBuf, MotionError>>>>;

fn session_in(dir: &Path) -> (VideoRecordingSession<FakeWriter>, Controls, Finished) {
    let controls = Controls::default();
    let opener_controls = controls.clone();
    let session = VideoRecordingSession::new(RecordingConfig::new(dir), move |path: &Path| {
        opener_controls.log.lock().unwrap().opened.push(path.to_path_buf());
        Ok(FakeWriter { controls: opener_controls.clone() })
    });

    let finished: Finished = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&finished);
    session.set_listener(move |result| sink.lock().unwrap().push(result));
    (session, controls, finished)
}

#[test]
fn media_time_rounds_to_nearest_tick() {
    assert_eq!(MediaTime::from_seconds(0.0, 600), MediaTime::ZERO);
    assert_eq!(MediaTime::from_seconds(1.0 / 60.0, 600).value, 10);
    assert_eq!(MediaTime::from_seconds(0.0166, 600).value, 10);
    assert_eq!(MediaTime::from_seconds(2.5, 600).seconds(), 2.5);
}

#[test]
fn start_opens_a_rotated_realtime_container() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());

    let path = session.start_with_stamp("20240102-030405").unwrap().unwrap();
    assert_eq!(path, dir.path().join("MotionVideo-20240102-030405.mov"));
    assert!(session.is_recording());

    let log = controls.log.lock().unwrap();
    assert_eq!(log.opened, vec![path]);
    assert_eq!(log.inputs.len(), 1);
    assert_eq!(log.inputs[0].time_scale, 600);
    assert!(log.inputs[0].expects_real_time);
    assert_eq!(log.inputs[0].rotation, core::f64::consts::FRAC_PI_2);
    assert_eq!(log.session_start, Some(MediaTime::ZERO));
}

#[test]
fn starting_twice_keeps_the_first_container() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());

    assert!(session.start().unwrap().is_some());
    assert!(session.start().unwrap().is_none());
    assert_eq!(controls.log.lock().unwrap().opened.len(), 1);
}

#[test]
fn first_accepted_frame_is_time_zero() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());
    session.start().unwrap();

    assert!(session.record_frame(1, 10.0));
    assert!(session.record_frame(2, 10.5));
    assert!(session.record_frame(3, 11.0));
    assert_eq!(session.recorded_frames(), 3);

    let ticks: Vec<(u32, i64)> = controls.log.lock().unwrap()
        .appended.iter()
        .map(|(frame, at)| (*frame, at.value))
        .collect();
    assert_eq!(ticks, vec![(1, 0), (2, 300), (3, 600)]);
}

#[test]
fn frames_dropped_while_busy_do_not_move_time_zero() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());
    session.start().unwrap();

    controls.busy.store(true, Ordering::SeqCst);
    assert!(!session.record_frame(1, 5.0));
    assert!(!session.record_frame(2, 5.1));
    assert!(controls.log.lock().unwrap().appended.is_empty());

    controls.busy.store(false, Ordering::SeqCst);
    assert!(session.record_frame(3, 5.5));
    assert!(session.record_frame(4, 6.0));

    let log = controls.log.lock().unwrap();
    assert_eq!(log.appended, vec![
        (3, MediaTime::ZERO),
        (4, MediaTime { value: 300, timescale: 600 }),
    ]);
}

#[test]
fn rejected_frames_do_not_move_time_zero() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());
    session.start().unwrap();

    controls.reject.store(true, Ordering::SeqCst);
    assert!(!session.record_frame(1, 4.0));
    assert_eq!(session.recorded_frames(), 0);

    controls.reject.store(false, Ordering::SeqCst);
    assert!(session.record_frame(2, 4.25));
    assert!(session.record_frame(3, 4.75));
    assert_eq!(session.recorded_frames(), 2);

    let log = controls.log.lock().unwrap();
    assert_eq!(log.appended, vec![
        (2, MediaTime::ZERO),
        (3, MediaTime { value: 300, timescale: 600 }),
    ]);
}

#[test]
fn slow_encoder_does_not_stall_the_motion_stream() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());
    session.start().unwrap();
    controls.append_delay_ms.store(500, Ordering::SeqCst);

    let session = Arc::new(session);
    let camera = {
        let session = Arc::clone(&session);
        thread::spawn(move || session.record_frame(1, 0.0))
    };
    while !controls.appending.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    let tracker = OrientationTracker::new();
    let motion = MotionRecordingSession::new(RecordingConfig::new(dir.path()));
    motion.start();

    let begin = Instant::now();
    let orientation = tracker.ingest(&Matrix3::identity());
    assert!(motion.record_sample(MotionSample::default(), orientation));
    tracker.calibrate_current();
    let waited = begin.elapsed();

    assert!(waited < Duration::from_millis(100), "motion stream waited {:?}", waited);
    assert!(camera.join().unwrap());
}

#[test]
fn frames_while_idle_are_not_recorded() {
    let dir = TempDir::new().unwrap();
    let (session, controls, _) = session_in(dir.path());

    assert!(!session.record_frame(1, 1.0));
    assert!(controls.log.lock().unwrap().appended.is_empty());
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let (session, controls, finished) = session_in(dir.path());

    assert!(!session.stop().unwrap());
    assert!(!controls.log.lock().unwrap().marked_finished);
    assert!(finished.lock().unwrap().is_empty());
}

#[test]
fn stop_is_deferred_while_encoder_busy() {
    let dir = TempDir::new().unwrap();
    let (session, controls, finished) = session_in(dir.path());
    let path = session.start().unwrap().unwrap();
    session.record_frame(1, 0.0);

    controls.busy.store(true, Ordering::SeqCst);
    assert!(matches!(session.stop(), Err(MotionError::EncoderNotReady)));
    assert!(session.is_recording());
    assert!(!controls.log.lock().unwrap().marked_finished);

    controls.busy.store(false, Ordering::SeqCst);
    assert!(session.stop().unwrap());
    assert!(controls.log.lock().unwrap().marked_finished);
    assert!(!session.is_recording());

    let finished = finished.lock().unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].as_ref().unwrap(), &path);
}

#[test]
fn failed_writer_blocks_stop_until_reset() {
    let dir = TempDir::new().unwrap();
    let (session, controls, finished) = session_in(dir.path());
    session.start().unwrap();

    controls.failed.store(true, Ordering::SeqCst);
    assert!(matches!(session.stop(), Err(MotionError::EncoderFailed(_))));
    assert!(matches!(session.stop(), Err(MotionError::EncoderFailed(_))));
    assert!(session.is_recording());
    assert!(finished.lock().unwrap().is_empty());

    assert!(session.reset());
    assert!(!session.is_recording());

    controls.failed.store(false, Ordering::SeqCst);
    assert!(session.start().unwrap().is_some());
    assert_eq!(controls.log.lock().unwrap().opened.len(), 2);
}

#[test]
fn finalize_completes_on_another_thread() {
    let dir = TempDir::new().unwrap();
    let (session, controls, finished) = session_in(dir.path());
    controls.defer_finish.store(true, Ordering::SeqCst);

    let path = session.start().unwrap().unwrap();
    session.record_frame(7, 3.0);
    assert!(session.stop().unwrap());

    // Still finalizing, the file may not be used yet and no new recording can start.
    assert!(session.is_finalizing());
    assert!(finished.lock().unwrap().is_empty());
    assert!(session.start().unwrap().is_none());
    assert!(!session.reset());

    let completion = controls.log.lock().unwrap().pending_finish.take().unwrap();
    thread::spawn(move || completion(WriterStatus::Completed)).join().unwrap();

    assert!(!session.is_recording());
    let finished = finished.lock().unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].as_ref().unwrap(), &path);
}

#[test]
fn failed_finalize_is_reported() {
    let dir = TempDir::new().unwrap();
    let (session, controls, finished) = session_in(dir.path());
    controls.defer_finish.store(true, Ordering::SeqCst);

    session.start().unwrap();
    session.stop().unwrap();
    let completion = controls.log.lock().unwrap().pending_finish.take().unwrap();
    completion(WriterStatus::Failed);

    assert!(!session.is_recording());
    let finished = finished.lock().unwrap();
    assert!(matches!(finished[0], Err(MotionError::EncoderFailed(_))));
}

#[test]
fn opener_error_leaves_session_idle() {
    let dir = TempDir::new().unwrap();
    let session: VideoRecordingSession<FakeWriter> = VideoRecordingSession::new(
        RecordingConfig::new(dir.path()),
        |path: &Path| Err(MotionError::write_failure(path, std::io::Error::other("no space left"))),
    );

    assert!(matches!(session.start(), Err(MotionError::WriteFailure { .. })));
    assert!(!session.is_recording());
}
