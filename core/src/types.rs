//! Shared type aliases used across the simulation.

/// Index of a reactor system, `0..system_count`.
pub type SystemId = usize;

/// Master RNG seed for a whole run.
pub type Seed = u64;
