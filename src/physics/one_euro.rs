//! One Euro Filter - adaptive low-pass filter for live wrist speed
//!
//! Smooth when the signal barely changes, responsive when it moves fast.
//! Live frames can't use the centered window of the batch pass (it needs
//! future samples), so the streaming path uses this instead.

use std::f64::consts::TAU;

/// Last accepted sample
#[derive(Clone, Copy, Debug)]
struct Sample {
    time: f64,
    value: f64,
    rate: f64,
}

/// Adaptive low-pass filter over a single scalar
#[derive(Clone, Debug)]
pub struct OneEuroFilter {
    /// Cutoff (Hz) when the signal is still; lower is smoother
    min_cutoff: f64,
    /// How fast the cutoff opens up with the signal's rate of change
    beta: f64,
    /// Cutoff (Hz) for the rate estimate itself
    rate_cutoff: f64,
    last: Option<Sample>,
}

/// Blend weight for the new sample of a first-order low-pass at `cutoff` Hz
fn alpha(dt: f64, cutoff: f64) -> f64 {
    let r = TAU * cutoff * dt;
    r / (r + 1.0)
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            rate_cutoff: 1.0,
            last: None,
        }
    }

    /// Tuned for wrist speed in m/s sampled at 15-60 Hz
    pub fn for_wrist_speed() -> Self {
        Self::new(1.5, 0.3)
    }

    /// Filter the sample `value` taken at `time` seconds
    ///
    /// The first sample passes through. A sample that does not move time
    /// forward returns the previous output unchanged.
    pub fn filter(&mut self, time: f64, value: f64) -> f64 {
        let Some(last) = self.last else {
            self.last = Some(Sample { time, value, rate: 0.0 });
            return value;
        };

        let dt = time - last.time;
        if dt <= 0.0 {
            return last.value;
        }

        let raw_rate = (value - last.value) / dt;
        let a_rate = alpha(dt, self.rate_cutoff);
        let rate = last.rate + a_rate * (raw_rate - last.rate);

        let a = alpha(dt, self.min_cutoff + self.beta * rate.abs());
        let smoothed = last.value + a * (value - last.value);

        self.last = Some(Sample { time, value: smoothed, rate });
        smoothed
    }

    /// Forget history; the next sample passes through
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::for_wrist_speed()
    }
}
