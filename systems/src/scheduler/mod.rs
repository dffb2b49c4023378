//! The host's flight loop scheduler. Plugins register flight loops with it and the
//! host calls the plugin back for every loop that is due in a frame.
use std::{fmt, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightLoopId(u64);
impl fmt::Display for FlightLoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flight loop {}", self.0)
    }
}

/// When a flight loop wants to be called next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NextFlightLoop {
    /// Stays registered, but isn't called until rescheduled.
    Stop,
    EveryFrame,
    After(Duration),
}

struct ScheduledFlightLoop {
    id: FlightLoopId,
    next: NextFlightLoop,
    remaining: Duration,
    since_last_call: Duration,
}
impl ScheduledFlightLoop {
    fn new(id: FlightLoopId, next: NextFlightLoop) -> Self {
        let mut scheduled = Self {
            id,
            next: NextFlightLoop::Stop,
            remaining: Duration::from_secs(0),
            since_last_call: Duration::from_secs(0),
        };
        scheduled.reschedule(next);

        scheduled
    }

    fn reschedule(&mut self, next: NextFlightLoop) {
        self.next = next;
        self.remaining = match next {
            NextFlightLoop::After(duration) => duration,
            _ => Duration::from_secs(0),
        };
    }

    fn advance(&mut self, delta: Duration) -> Option<Duration> {
        self.since_last_call += delta;

        let is_due = match self.next {
            NextFlightLoop::Stop => false,
            NextFlightLoop::EveryFrame => true,
            NextFlightLoop::After(interval) => {
                match self.remaining.checked_sub(delta) {
                    Some(remaining) if remaining > Duration::from_secs(0) => {
                        self.remaining = remaining;
                        false
                    }
                    _ => {
                        self.remaining = interval;
                        true
                    }
                }
            }
        };

        if is_due {
            let elapsed = self.since_last_call;
            self.since_last_call = Duration::from_secs(0);
            Some(elapsed)
        } else {
            None
        }
    }
}

pub struct Scheduler {
    next_id: u64,
    flight_loops: Vec<ScheduledFlightLoop>,
}
impl Scheduler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            flight_loops: vec![],
        }
    }

    pub fn register(&mut self, next: NextFlightLoop) -> FlightLoopId {
        let id = FlightLoopId(self.next_id);
        self.next_id += 1;
        self.flight_loops.push(ScheduledFlightLoop::new(id, next));

        id
    }

    /// Returns whether the flight loop was registered.
    pub fn unregister(&mut self, id: FlightLoopId) -> bool {
        let count = self.flight_loops.len();
        self.flight_loops.retain(|flight_loop| flight_loop.id != id);

        count != self.flight_loops.len()
    }

    pub fn is_registered(&self, id: FlightLoopId) -> bool {
        self.flight_loops.iter().any(|flight_loop| flight_loop.id == id)
    }

    pub fn registered_count(&self) -> usize {
        self.flight_loops.len()
    }

    pub fn reschedule(&mut self, id: FlightLoopId, next: NextFlightLoop) {
        if let Some(flight_loop) = self.flight_loops.iter_mut().find(|x| x.id == id) {
            flight_loop.reschedule(next);
        }
    }

    /// Advances all flight loops by the given delta. Returns the loops which are due in
    /// registration order, together with the time elapsed since each was last called.
    pub fn advance(&mut self, delta: Duration) -> Vec<(FlightLoopId, Duration)> {
        self.flight_loops
            .iter_mut()
            .filter_map(|flight_loop| {
                flight_loop
                    .advance(delta)
                    .map(|elapsed| (flight_loop.id, elapsed))
            })
            .collect()
    }
}
impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_frame_loop_is_due_each_frame() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::EveryFrame);

        assert_eq!(
            scheduler.advance(Duration::from_millis(20)),
            vec![(id, Duration::from_millis(20))]
        );
        assert_eq!(
            scheduler.advance(Duration::from_millis(30)),
            vec![(id, Duration::from_millis(30))]
        );
    }

    #[test]
    fn delayed_loop_is_due_once_the_delay_passed() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::After(Duration::from_secs(5)));

        assert!(scheduler.advance(Duration::from_secs(2)).is_empty());
        assert!(scheduler.advance(Duration::from_secs(2)).is_empty());
        assert_eq!(
            scheduler.advance(Duration::from_secs(2)),
            vec![(id, Duration::from_secs(6))]
        );
    }

    #[test]
    fn delayed_loop_repeats_at_its_interval_until_rescheduled() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::After(Duration::from_secs(2)));

        assert_eq!(scheduler.advance(Duration::from_secs(2)).len(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)).len(), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(1)).len(), 1);

        scheduler.reschedule(id, NextFlightLoop::Stop);
        assert_eq!(scheduler.advance(Duration::from_secs(2)).len(), 0);
    }

    #[test]
    fn stopped_loop_stays_registered_but_is_never_due() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::EveryFrame);

        scheduler.reschedule(id, NextFlightLoop::Stop);

        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());
        assert!(scheduler.is_registered(id));
    }

    #[test]
    fn unregistered_loop_is_never_due() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::EveryFrame);

        assert!(scheduler.unregister(id));

        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
        assert!(!scheduler.is_registered(id));
    }

    #[test]
    fn unregistering_an_unknown_loop_returns_false() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(NextFlightLoop::EveryFrame);
        scheduler.unregister(id);

        assert!(!scheduler.unregister(id));
    }

    #[test]
    fn ids_are_unique() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.register(NextFlightLoop::EveryFrame);
        scheduler.unregister(first);
        let second = scheduler.register(NextFlightLoop::EveryFrame);

        assert_ne!(first, second);
    }
}
