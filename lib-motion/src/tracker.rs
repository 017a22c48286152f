use core::cell::RefCell;
use critical_section::Mutex;
use math::Matrix3;

use crate::MotionSample;

/// Converts between the handedness of the headphone frame and the handedness of the render and
/// recording space by negating the X-axis.
///
pub const MIRROR: Matrix3 = Matrix3::diagonal(-1.0, 1.0, 1.0);

/// Axis remap table from the sensor's native axes to the render/record axes. For every entry of
/// the remapped matrix (row-major) it holds the row and column of the raw sensor entry the value
/// is taken from plus the sign applied to it.
///
/// These follow from how the sensor is mounted in the headphones, they never change.
///
pub const AXIS_REMAP: [[(usize, usize, f64); 3]; 3] = [
    [(0, 0, -1.0), (2, 0, -1.0), (1, 0, -1.0)],
    [(0, 2, 1.0), (2, 2, 1.0), (1, 2, 1.0)],
    [(0, 1, 1.0), (2, 1, 1.0), (1, 1, 1.0)],
];

/// Relabels the axes of a raw sensor rotation according to [`AXIS_REMAP`].
///
pub fn remap(raw: &Matrix3) -> Matrix3 {
    let source = raw.rows();
    let mut out = [[0.0; 3]; 3];
    for (row, table) in out.iter_mut().zip(AXIS_REMAP.iter()) {
        for (value, &(i, j, sign)) in row.iter_mut().zip(table.iter()) {
            *value = sign * source[i][j];
        }
    }
    Matrix3::from_rows(out)
}

/// Connection events of the headphone motion source. These are informational, apart from a
/// (re)connect which makes the current head pose the new "forward".
///
#[derive(Debug, Clone, PartialEq)]
pub enum MotionEvent
{
    Connected,
    Disconnected,
    Failed(String),
}

type OrientationListener = Box<dyn FnMut(&Matrix3) + Send>;

struct TrackerState
{
    /// Orientation treated as "zero", stored already inverted.
    reference: Matrix3,

    /// Most recent raw sensor rotation, `None` until the first sample arrived.
    last_raw: Option<Matrix3>,
}

/// Turns raw headphone attitude into the orientation that gets rendered and recorded:
/// `MIRROR * remap(raw) * reference`.
///
/// All methods take `&self`, the reference frame is guarded so calibration requests can come
/// from a different context than the sample stream.
///
pub struct OrientationTracker
{
    state: Mutex<RefCell<TrackerState>>,
    listener: Mutex<RefCell<Option<OrientationListener>>>,
}

impl OrientationTracker
{
    pub fn new() -> Self {
        OrientationTracker {
            state: Mutex::new(RefCell::new(TrackerState {
                reference: Matrix3::identity(),
                last_raw: None,
            })),
            listener: Mutex::new(RefCell::new(None)),
        }
    }

    /// Registers the single listener that gets every orientation computed by `on_sample`,
    /// replacing any previous one.
    ///
    pub fn set_listener<F>(&self, listener: F)
    where
        F: FnMut(&Matrix3) + Send + 'static,
    {
        critical_section::with(|cs| {
            self.listener.borrow_ref_mut(cs).replace(Box::new(listener));
        });
    }

    pub fn clear_listener(&self) {
        critical_section::with(|cs| {
            self.listener.borrow_ref_mut(cs).take();
        });
    }

    /// Computes the rendered orientation for a raw sensor rotation against the current reference
    /// frame. The raw rotation is remembered for `current_orientation` and `calibrate_current`.
    ///
    pub fn ingest(&self, raw: &Matrix3) -> Matrix3 {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.last_raw = Some(*raw);
            render(raw, &state.reference)
        })
    }

    /// Push entry point for the motion source: ingests the sample's attitude and hands the
    /// result to the registered listener.
    ///
    pub fn on_sample(&self, sample: &MotionSample) -> Matrix3 {
        let orientation = self.ingest(&sample.attitude.rotation);

        // The listener runs outside of the critical section so it is free to call back into the
        // tracker, e.g. to calibrate.
        let listener = critical_section::with(|cs| self.listener.borrow_ref_mut(cs).take());
        if let Some(mut listener) = listener {
            listener(&orientation);
            critical_section::with(|cs| {
                let mut slot = self.listener.borrow_ref_mut(cs);
                if slot.is_none() {
                    *slot = Some(listener);
                }
            });
        }
        orientation
    }

    /// Makes the given raw rotation the new "forward". Without a rotation (no sample available)
    /// the reference frame is left as it is and `false` is returned.
    ///
    pub fn calibrate(&self, raw: Option<&Matrix3>) -> bool {
        let Some(raw) = raw else {
            log::debug!("No motion sample available, keeping the current reference frame");
            return false;
        };

        // The remapped rotation is orthonormal so its transpose is its inverse.
        let reference = remap(raw).transpose();
        critical_section::with(|cs| {
            self.state.borrow_ref_mut(cs).reference = reference;
        });
        log::info!("Reference frame updated");
        true
    }

    /// Calibrates against the most recently ingested sample, if there is one.
    ///
    pub fn calibrate_current(&self) -> bool {
        let last_raw = critical_section::with(|cs| self.state.borrow_ref(cs).last_raw);
        self.calibrate(last_raw.as_ref())
    }

    /// Orientation of the most recent sample against the current reference frame, or `None` if
    /// no sample has arrived yet.
    ///
    pub fn current_orientation(&self) -> Option<Matrix3> {
        critical_section::with(|cs| {
            let state = self.state.borrow_ref(cs);
            state.last_raw.map(|raw| render(&raw, &state.reference))
        })
    }

    pub fn reference(&self) -> Matrix3 {
        critical_section::with(|cs| self.state.borrow_ref(cs).reference)
    }

    pub fn handle_event(&self, event: MotionEvent) {
        match event {
            MotionEvent::Connected => {
                log::info!("Headphones connected");
                self.calibrate_current();
            },
            MotionEvent::Disconnected => log::info!("Headphones disconnected"),
            MotionEvent::Failed(reason) => log::warn!("Headphone motion updates failed: {}", reason),
        }
    }
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn render(raw: &Matrix3, reference: &Matrix3) -> Matrix3 {
    MIRROR * remap(raw) * *reference
}
