use std::time::Duration;

/// Tracks how long to wait between ticks and whether ticking should happen at
/// all.
///
/// The interval shrinks geometrically after every tick until it reaches the
/// floor.  The thread that actually waits on the clock lives in
/// [`crate::ticker`]; it consults this struct before every firing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TickScheduler {
    starting_interval: Duration,
    interval: Duration,
    multiplier: f64,
    floor: Duration,
    active: bool,
    /// Incremented whenever ticking begins, on `start()` and on `resume()`, so
    /// that a timer left over from before can tell it has been superseded
    generation: u64,
}

impl TickScheduler {
    pub(crate) fn new(starting_interval: Duration, multiplier: f64, floor: Duration) -> Self {
        debug_assert!(
            multiplier > 0.0 && multiplier < 1.0,
            "speed multiplier must be between 0 and 1"
        );
        TickScheduler {
            starting_interval,
            interval: starting_interval,
            multiplier,
            floor,
            active: false,
            generation: 0,
        }
    }

    pub(crate) fn start(&mut self) {
        self.interval = self.starting_interval;
        self.active = true;
        self.generation += 1;
    }

    pub(crate) fn advance_interval(&mut self) {
        self.interval = self.interval.mul_f64(self.multiplier).max(self.floor);
    }

    pub(crate) fn cancel(&mut self) {
        self.active = false;
    }

    /// Start firing again after a [`cancel()`][Self::cancel], keeping the
    /// current interval
    pub(crate) fn resume(&mut self) {
        self.active = true;
        self.generation += 1;
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> TickScheduler {
        TickScheduler::new(Duration::from_secs(1), 0.5, Duration::from_millis(100))
    }

    #[test]
    fn speeds_up_to_floor() {
        let mut sched = scheduler();
        sched.start();
        assert_eq!(sched.interval(), Duration::from_secs(1));
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(500));
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(250));
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(125));
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(100));
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(100));
    }

    #[test]
    fn never_below_floor() {
        let mut sched =
            TickScheduler::new(Duration::from_millis(700), 0.99, Duration::from_millis(50));
        sched.start();
        let mut previous = sched.interval();
        for _ in 0..1000 {
            sched.advance_interval();
            assert!(sched.interval() >= Duration::from_millis(50));
            assert!(sched.interval() <= previous);
            previous = sched.interval();
        }
        assert_eq!(sched.interval(), Duration::from_millis(50));
    }

    #[test]
    fn start_restores_interval() {
        let mut sched = scheduler();
        sched.start();
        sched.advance_interval();
        sched.advance_interval();
        sched.cancel();
        sched.start();
        assert_eq!(sched.interval(), Duration::from_secs(1));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sched = scheduler();
        assert!(!sched.is_active());
        sched.start();
        assert!(sched.is_active());
        sched.cancel();
        sched.cancel();
        assert!(!sched.is_active());
    }

    #[test]
    fn resume_keeps_interval() {
        let mut sched = scheduler();
        sched.start();
        sched.advance_interval();
        sched.cancel();
        assert!(!sched.is_active());
        sched.resume();
        assert!(sched.is_active());
        assert_eq!(sched.interval(), Duration::from_millis(500));
        assert_eq!(sched.generation(), 2);
        sched.advance_interval();
        assert_eq!(sched.interval(), Duration::from_millis(250));
    }

    #[test]
    fn generation_counts_starts() {
        let mut sched = scheduler();
        assert_eq!(sched.generation(), 0);
        sched.start();
        sched.cancel();
        sched.start();
        assert_eq!(sched.generation(), 2);
    }
}
