//! Random number generation.
//!
//! Every concurrent task gets its own `TaskRng` stream derived from
//! one master seed, so tasks never contend on a shared generator and
//! a fixed seed reproduces each task's roll sequence regardless of
//! how the tasks interleave.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Seed;

/// Stable stream assignments. Append only — reordering changes every
/// task's derived seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum TaskSlot {
    /// Initial system values and rates.
    Setup = 0,
    /// The random event generator.
    Events = 1,
    /// Player action outcomes (vent backflow, override roll).
    Actions = 2,
}

/// Hands out per-task RNG streams for one run.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: Seed,
}

impl RngBank {
    pub fn new(master_seed: Seed) -> Self {
        Self { master_seed }
    }

    pub fn from_entropy() -> Self {
        Self {
            master_seed: rand::random(),
        }
    }

    pub fn master_seed(&self) -> Seed {
        self.master_seed
    }

    pub fn for_task(&self, slot: TaskSlot) -> TaskRng {
        TaskRng::new(self.master_seed, slot)
    }
}

/// A single task's private RNG stream.
#[derive(Debug, Clone)]
pub struct TaskRng {
    inner: Pcg64Mcg,
}

impl TaskRng {
    fn new(master_seed: Seed, slot: TaskSlot) -> Self {
        let derived = master_seed ^ ((slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Uniform f64 in [0, 1).
    pub fn fraction(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform i32 in [lo, hi).
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo < hi);
        lo + (self.inner.next_u64() % (hi - lo) as u64) as i32
    }

    /// Uniform usize in [0, n). `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Bernoulli trial: true with probability `p` percent.
    pub fn percent(&mut self, p: u32) -> bool {
        self.inner.next_u64() % 100 < u64::from(p)
    }
}
