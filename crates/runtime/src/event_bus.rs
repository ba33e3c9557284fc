use foundation::time::Time;

/// A recorded session event.
///
/// `kind` is a short stable tag (`"fetch.issued"`, `"fetch.dropped"`, ...)
/// so traces can be compared in tests without matching on message text.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub at: Time,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: Time, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.5), "a", "first");
        bus.emit(Time(1.0), "b", "second");
        bus.emit(Time(1.0), "a", "third");
        assert_eq!(bus.events().len(), 3);
        assert_eq!(bus.events()[1].at, Time(1.0));
        assert_eq!(bus.count("a"), 2);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Time::ZERO, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
