//! Random sources for the flicker effect

use rand::{Rng, RngCore, SeedableRng};

/// Uniform random numbers in a half-open range
pub trait RandomSource {
    /// Sample from `[low, high)`
    fn next_in(&mut self, low: f32, high: f32) -> f32;
}

impl<R: RngCore> RandomSource for R {
    fn next_in(&mut self, low: f32, high: f32) -> f32 {
        if low >= high {
            return low;
        }
        self.gen_range(low..high)
    }
}

/// Build the random source used by the frame loop: seeded when a seed is
/// given, from OS entropy otherwise.
pub fn flicker_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    }
}

/// Replays a fixed list of unit values in `[0, 1)`, cycling when exhausted
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    calls: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, calls: 0 }
    }

    /// Number of samples drawn so far
    pub fn calls(&self) -> usize {
        self.calls
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_in(&mut self, low: f32, high: f32) -> f32 {
        let unit = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.calls % self.values.len()]
        };
        self.calls += 1;

        let value = low + unit.clamp(0.0, 1.0) * (high - low);
        // Keep the upper bound exclusive even for a scripted 1.0
        if value >= high && high > low {
            high - (high - low) * f32::EPSILON
        } else {
            value
        }
    }
}
