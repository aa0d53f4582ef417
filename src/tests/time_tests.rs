#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::{ManualClock, MonotonicClock, Time, TimeSource};
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new();

        clock.advance(Duration::from_millis(250));
        clock.advance(Duration::from_millis(750));
        assert_eq!(clock.now(), Duration::from_secs(1));

        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_manual_clock_clones_share_reading() {
        let clock = ManualClock::new();
        let time = Time::with_source(clock.clone());

        clock.advance(Duration::from_millis(1001));
        assert_eq!(time.now(), Duration::from_millis(1001));
    }

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let first = clock.now();

        // Sleep to allow some time to pass
        sleep(Duration::from_millis(10));

        let second = clock.now();
        assert!(second >= first + Duration::from_millis(10));
    }

    #[test]
    fn test_time_debug_shows_reading() {
        let clock = ManualClock::new();
        clock.set(Duration::from_millis(5));
        let time = Time::with_source(clock);

        assert!(format!("{time:?}").contains("5ms"));
    }
}
