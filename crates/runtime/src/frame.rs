use foundation::time::Time;

/// Per-frame timing handed to the compositor.
///
/// Frames are either stepped at a fixed delta (`new` / `next`) for replay, or
/// stamped with a measured elapsed time (`at`) when driven by a real clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Elapsed time since the clock started.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn at(index: u64, time: Time) -> Self {
        Self {
            index,
            dt_s: 0.0,
            time,
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    pub fn elapsed_s(&self) -> f64 {
        self.time.seconds()
    }
}
