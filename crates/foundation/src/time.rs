/// Engine time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: u64) -> Self {
        Time(ms as f64 / 1000.0)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, delay_s: f64) -> Self {
        Time(self.0 + delay_s)
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_and_offsets() {
        let t = Time::from_millis(1500);
        assert_eq!(t.seconds(), 1.5);
        assert_eq!(t.after(0.5), Time(2.0));
        assert_eq!(Time(1.0).since(t), 0.0);
        assert_eq!(t.since(Time::ZERO), 1.5);
    }
}
