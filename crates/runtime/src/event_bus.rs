/// Event stamped with its emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub seq: u64,
    pub payload: E,
}

/// Append-only event log drained by the presentation layer.
///
/// Sequence numbers keep increasing across drains so consumers can tell
/// whether they missed anything.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, payload: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event { seq, payload });
        seq
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit("a");
        bus.emit("b");
        let payloads: Vec<_> = bus.events().iter().map(|e| e.payload).collect();
        assert_eq!(payloads, vec!["a", "b"]);
        assert_eq!(bus.events()[1].seq, 1);
    }

    #[test]
    fn drain_clears_events_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.emit(1);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        assert_eq!(bus.emit(2), 1);
    }
}
