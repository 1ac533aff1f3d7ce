//! Sliding-window speed estimate.

use std::collections::VecDeque;

use cov_core::{Distance, Speed, Time};

/// FIFO of `(Δt, Δd)` samples covering roughly the last `window` of
/// travel.
///
/// The newest sample is always kept, so sparse tracks still produce a
/// speed equal to their last step.
#[derive(Clone, Debug)]
pub struct SpeedSmoother {
    window:   Time,
    samples:  VecDeque<(Time, Distance)>,
    time:     Time,
    distance: Distance,
}

impl SpeedSmoother {
    pub fn new(window: Time) -> Self {
        Self {
            window,
            samples:  VecDeque::new(),
            time:     Time::ZERO,
            distance: Distance::ZERO,
        }
    }

    /// Add a step and return the smoothed speed.
    pub fn push(&mut self, dt: Time, dd: Distance) -> Speed {
        self.samples.push_back((dt, dd));
        self.time = self.time + dt;
        self.distance = self.distance + dd;

        while self.samples.len() > 1 && self.time > self.window {
            if let Some((t, d)) = self.samples.pop_front() {
                self.time = self.time - t;
                self.distance = self.distance - d;
            }
        }
        self.speed()
    }

    /// Average over the buffered samples; zero until some time has
    /// accumulated.
    pub fn speed(&self) -> Speed {
        if self.time.seconds() > 0.0 && self.distance.radians() >= 0.0 {
            self.distance / self.time
        } else {
            Speed::ZERO
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.time = Time::ZERO;
        self.distance = Distance::ZERO;
    }
}
