//! Simulation tuning knobs.
//!
//! All timing and balance constants live here so tests can run the
//! whole game at millisecond scale instead of real time.

use std::time::Duration;

/// Display names, indexed by system id. Event templates that couple
/// two systems look them up by name, never by raw index.
pub const SYSTEM_NAMES: [&str; 5] = [
    "Coolant Flow",
    "Pressure Ctrl",
    "Core Temp",
    "Shield Integrity",
    "Power Output",
];

/// System integrity is clamped to this range at every mutation.
pub const MAX_SYSTEM_VALUE: i32 = 100;
pub const MIN_SYSTEM_VALUE: i32 = 0;

/// At or below this value a system reads as critical.
pub const CRITICAL_THRESHOLD: i32 = 20;
/// At or below this value (but above critical) a system reads as a warning.
pub const WARNING_THRESHOLD: i32 = 50;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub system_count: usize,
    pub initial_repair_kits: u32,
    pub log_capacity: usize,
    /// Period of the background decay tick.
    pub degradation_tick: Duration,
    /// Random events fire after a uniform delay in [min, max).
    pub event_interval_min: Duration,
    pub event_interval_max: Duration,
    pub stabilize_duration: Duration,
    /// How long a sensor glitch inflates a degradation rate.
    pub glitch_restore_delay: Duration,
    /// Deliberate stall while a manual override engages.
    pub override_delay: Duration,
    /// Survive this long and the run is won.
    pub survival_duration: Duration,
    pub ui_tick: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            system_count: SYSTEM_NAMES.len(),
            initial_repair_kits: 3,
            log_capacity: 10,
            degradation_tick: Duration::from_millis(750),
            event_interval_min: Duration::from_secs(8),
            event_interval_max: Duration::from_secs(15),
            stabilize_duration: Duration::from_secs(5),
            glitch_restore_delay: Duration::from_secs(15),
            override_delay: Duration::from_millis(500),
            survival_duration: Duration::from_secs(180),
            ui_tick: Duration::from_millis(200),
        }
    }
}

impl GameConfig {
    /// Same shape as the real game, compressed to millisecond scale so
    /// integration tests finish quickly.
    pub fn fast_test() -> Self {
        Self {
            degradation_tick: Duration::from_millis(20),
            event_interval_min: Duration::from_millis(40),
            event_interval_max: Duration::from_millis(80),
            stabilize_duration: Duration::from_millis(80),
            glitch_restore_delay: Duration::from_millis(60),
            override_delay: Duration::from_millis(10),
            survival_duration: Duration::from_millis(500),
            ui_tick: Duration::from_millis(10),
            ..Self::default()
        }
    }
}
