use foundation::time::Time;

/// Trailing-edge debouncer driven by explicit timestamps.
///
/// Every `trigger` pushes the deadline to `now + delay`; `poll` fires once
/// when the deadline has passed and then disarms.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_s: f64,
    deadline: Option<Time>,
}

impl Debouncer {
    pub fn new(delay_s: f64) -> Self {
        Self {
            delay_s: delay_s.max(0.0),
            deadline: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(ms as f64 / 1000.0)
    }

    pub fn trigger(&mut self, now: Time) {
        self.deadline = Some(now.after(self.delay_s));
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    /// Returns `true` exactly once per quiet period.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
