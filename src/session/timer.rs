use std::time::Instant;

/// The single timing window of a session.
///
/// There is exactly one of these per session and `start` replaces any prior
/// window, so a new typing phase can never leave a stale clock ticking.
/// Methods take `now` explicitly so transitions are deterministic under test.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionTimer {
    started_at: Option<Instant>,
    frozen_secs: Option<u64>,
}

impl SessionTimer {
    /// Begin a new window at `now`, discarding any previous start or frozen
    /// value.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.frozen_secs = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Capture the wall-clock delta at `now` and pin `elapsed_secs` to it.
    pub fn freeze(&mut self, now: Instant) -> u64 {
        self.frozen_secs = None;
        let secs = self.elapsed_secs(now);
        self.frozen_secs = Some(secs);
        secs
    }

    /// Resume wall-clock measurement after a failed scoring attempt.
    pub fn thaw(&mut self) {
        self.frozen_secs = None;
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        if let Some(secs) = self.frozen_secs {
            return secs;
        }
        match self.started_at {
            Some(start) => now.saturating_duration_since(start).as_secs(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn unstarted_timer_reads_zero() {
        let timer = SessionTimer::default();
        assert!(!timer.started());
        assert_eq!(timer.elapsed_secs(Instant::now()), 0);
    }

    #[test]
    fn measures_wall_clock_delta() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::default();
        timer.start(t0);
        assert_eq!(timer.elapsed_secs(t0 + Duration::from_secs(7)), 7);
    }

    #[test]
    fn freeze_pins_the_value() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::default();
        timer.start(t0);
        let frozen = timer.freeze(t0 + Duration::from_secs(12));
        assert_eq!(frozen, 12);
        // Later reads keep the frozen value, not the live delta.
        assert_eq!(timer.elapsed_secs(t0 + Duration::from_secs(99)), 12);
    }

    #[test]
    fn thaw_resumes_from_original_start() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::default();
        timer.start(t0);
        timer.freeze(t0 + Duration::from_secs(5));
        timer.thaw();
        assert_eq!(timer.elapsed_secs(t0 + Duration::from_secs(20)), 20);
    }

    #[test]
    fn start_replaces_prior_window() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::default();
        timer.start(t0);
        timer.freeze(t0 + Duration::from_secs(30));
        timer.start(t0 + Duration::from_secs(40));
        assert_eq!(timer.elapsed_secs(t0 + Duration::from_secs(43)), 3);
    }

    #[test]
    fn clear_resets_everything() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::default();
        timer.start(t0);
        timer.clear();
        assert!(!timer.started());
        assert_eq!(timer.elapsed_secs(t0 + Duration::from_secs(10)), 0);
    }

    #[test]
    fn now_before_start_saturates_to_zero() {
        let t0 = Instant::now() + Duration::from_secs(100);
        let mut timer = SessionTimer::default();
        timer.start(t0);
        assert_eq!(timer.elapsed_secs(Instant::now()), 0);
    }
}
