/// Sequence number attached to an outgoing request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Issues monotonically increasing generations and tells whether a
/// completed request is still the latest one.
#[derive(Debug, Default, Clone)]
pub struct Generations {
    latest: u64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    pub fn latest(&self) -> Option<Generation> {
        (self.latest > 0).then_some(Generation(self.latest))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::{Generation, Generations};

    #[test]
    fn only_latest_is_current() {
        let mut g = Generations::new();
        assert_eq!(g.latest(), None);
        let a = g.issue();
        let b = g.issue();
        assert!(a < b);
        assert!(!g.is_current(a));
        assert!(g.is_current(b));
        assert_eq!(g.latest(), Some(Generation(2)));
    }
}
