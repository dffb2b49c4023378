use std::time::Duration;

/// The warning throttle limits how often a recurring failure is reported.
/// The first failure of a streak is reported immediately, after which
/// the failure is reported at most once per interval until the streak ends.
pub struct WarningThrottle {
    interval: Duration,
    since_last_report: Option<Duration>,
    suppressed: usize,
}
impl WarningThrottle {
    pub fn new(interval: Duration) -> WarningThrottle {
        WarningThrottle {
            interval,
            since_last_report: None,
            suppressed: 0,
        }
    }

    /// Registers a failure which occurred `delta` after the previous one.
    /// Returns the number of failures suppressed since the last report when
    /// this failure should be reported.
    pub fn failure(&mut self, delta: Duration) -> Option<usize> {
        let should_report = match self.since_last_report {
            None => true,
            Some(elapsed) => {
                let elapsed = elapsed + delta;
                self.since_last_report = Some(elapsed);
                elapsed >= self.interval
            }
        };

        if should_report {
            self.since_last_report = Some(Duration::from_secs(0));
            Some(std::mem::replace(&mut self.suppressed, 0))
        } else {
            self.suppressed += 1;
            None
        }
    }

    /// Ends the current failure streak. Returns whether a streak was in progress.
    pub fn reset(&mut self) -> bool {
        self.suppressed = 0;
        self.since_last_report.take().is_some()
    }

    pub fn in_streak(&self) -> bool {
        self.since_last_report.is_some()
    }
}
