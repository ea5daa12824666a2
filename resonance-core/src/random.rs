//! Injectable random sources
//!
//! Every coin flip in the collective goes through [`RandomSource`] so that a
//! seeded or scripted source can reproduce exact outcomes.

use std::collections::VecDeque;

/// A source of uniform samples in `[0, 1)`
pub trait RandomSource: Send {
    /// Next sample in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index into a collection of `len` elements (`len > 0`)
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len - 1)
    }
}

/// Seedable source backed by `fastrand`
pub struct SeededRandom {
    rng: fastrand::Rng,
}

impl SeededRandom {
    /// Source with a fixed seed (reproducible)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Source seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Replays a fixed list of samples, then repeats the fallback value.
///
/// Used in tests to force specific branches of the evolution rules.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    queue: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    /// Samples are returned in order; afterwards `0.0` forever
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
            fallback: 0.0,
        }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: value,
        }
    }

    /// Value returned once the script is exhausted
    pub fn with_fallback(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }

    /// Samples not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
