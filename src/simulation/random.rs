// Injectable randomness for the simulation engine
//
// Every draw the engine makes goes through `RandomSource`, so tests can swap
// in a seeded `StdRng` or a scripted `SequenceRandom` and assert exact output.

use std::f64::consts::PI;

use rand::Rng;

pub trait RandomSource {
    /// Uniform draw in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Normal draw via Box-Muller; both uniforms are mapped into (0, 1]
    fn gaussian(&mut self, mean: f64, stdev: f64) -> f64 {
        let u = 1.0 - self.next_f64();
        let v = 1.0 - self.next_f64();
        let z = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();
        z * stdev + mean
    }

    /// Fair coin; `true` means heads
    fn coin_flip(&mut self) -> bool {
        self.next_f64() > 0.5
    }

    /// Uniform integer in [low, high]
    fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high);
        let span = (high - low + 1) as f64;
        (low + (self.next_f64() * span).floor() as u32).min(high)
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of uniform draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
    draws: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceRandom needs at least one value");
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Total number of uniform draws taken so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        value
    }
}
