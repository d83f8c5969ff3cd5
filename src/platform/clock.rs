//! Fixed-step accumulator

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into a bounded number of fixed steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a timestamp in milliseconds; returns how many steps to run
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }
        steps
    }

    /// Forget the last timestamp so a resumed tab does not catch up
    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0);
    }

    #[test]
    fn test_steady_60hz() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += clock.advance(i as f64 * 1000.0 / 60.0);
        }
        assert!((59..=60).contains(&total), "ran {} steps", total);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // A 5 s stall counts as 50 ms, about three steps
        let steps = clock.advance(5000.0);
        assert!((2..=3).contains(&steps), "ran {} steps", steps);
    }

    proptest! {
        #[test]
        fn prop_steps_bounded(deltas in proptest::collection::vec(0.0f64..500.0, 1..50)) {
            let mut clock = FrameClock::new();
            let mut now = 0.0;
            clock.advance(now);
            for d in deltas {
                now += d;
                prop_assert!(clock.advance(now) <= MAX_SUBSTEPS);
            }
        }
    }
}
