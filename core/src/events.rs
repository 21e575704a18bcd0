//! The random event generator and its effect templates.
//!
//! A background task sleeps a uniform random interval, then applies
//! one of five templates chosen uniformly. Templates mutate systems
//! through their own locks and log what they did; none of them awaits
//! while holding a lock.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::rng::TaskRng;
use crate::state::{GameState, Phase};
use crate::types::SystemId;

/// Names bound by the coolant-leak coupling rule.
const COOLANT_SYSTEM: &str = "Coolant Flow";
const CORE_TEMP_SYSTEM: &str = "Core Temp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PowerSurge,
    CoolantLeak,
    SensorGlitch,
    EfficiencyBoost,
    CosmicRays,
}

/// Runs until shutdown fires or the game leaves `Running`.
pub async fn run(state: Arc<GameState>, mut rng: TaskRng, mut shutdown: watch::Receiver<bool>) {
    loop {
        let min = state.config().event_interval_min;
        let span = state.config().event_interval_max - min;
        let wait = min + span.mul_f64(rng.fraction());
        tokio::select! {
            _ = sleep(wait) => {}
            _ = shutdown.changed() => break,
        }
        if state.phase() != Phase::Running {
            break;
        }
        trigger(&state, &mut rng);
    }
    log::debug!("event generator exiting");
}

/// Roll a target and a template, then apply it.
pub fn trigger(state: &Arc<GameState>, rng: &mut TaskRng) {
    let target = rng.below(state.systems().len());
    let kind = match rng.below(5) {
        0 => EventKind::PowerSurge,
        1 => EventKind::CoolantLeak,
        2 => EventKind::SensorGlitch,
        3 => EventKind::EfficiencyBoost,
        _ => EventKind::CosmicRays,
    };
    apply(state, rng, kind, target);
}

/// Apply one template to `target` (ignored by `CosmicRays`, which
/// picks its own victims).
pub fn apply(state: &Arc<GameState>, rng: &mut TaskRng, kind: EventKind, target: SystemId) {
    match kind {
        EventKind::PowerSurge => power_surge(state, rng, target),
        EventKind::CoolantLeak => coolant_leak(state, rng, target),
        EventKind::SensorGlitch => sensor_glitch(state, target),
        EventKind::EfficiencyBoost => efficiency_boost(state, rng, target),
        EventKind::CosmicRays => cosmic_rays(state, rng),
    }
}

fn power_surge(state: &GameState, rng: &mut TaskRng, target: SystemId) {
    let cell = &state.systems()[target];
    let damage = rng.range(10, 30);
    cell.harm(damage);
    state.add_log(format!(
        "EVENT: Power surge in {} ({})! Damage: {}",
        cell.name(),
        target,
        damage
    ));
}

/// A leak hurts its target, and a leak on the coolant system itself
/// permanently worsens core temperature decay.
fn coolant_leak(state: &GameState, rng: &mut TaskRng, target: SystemId) {
    let cell = &state.systems()[target];
    let damage = rng.range(10, 25);
    cell.harm(damage);
    state.add_log(format!(
        "EVENT: Coolant leak detected near {} ({})! Damage: {}",
        cell.name(),
        target,
        damage
    ));
    if cell.name() == COOLANT_SYSTEM {
        if let Some(core) = state
            .systems()
            .iter()
            .find(|c| c.name() == CORE_TEMP_SYSTEM)
        {
            core.raise_rate(1);
            state.add_log(format!(
                "INFO: {} ({}) degradation increased due to coolant issue.",
                core.name(),
                core.id()
            ));
        }
    }
}

/// Inflates the target's degradation rate, then restores the rate
/// that was in effect when the glitch struck after a fixed delay.
/// Restores are last-writer-wins: overlapping glitches on one system
/// can leave it on the earlier rate once both restores have fired.
fn sensor_glitch(state: &Arc<GameState>, target: SystemId) {
    let cell = &state.systems()[target];
    let previous = cell.raise_rate(2);
    state.add_log(format!(
        "EVENT: Sensor glitch on {} ({}). Readings unreliable, decay accelerating.",
        cell.name(),
        target
    ));

    let state = Arc::clone(state);
    let delay = state.config().glitch_restore_delay;
    tokio::spawn(async move {
        sleep(delay).await;
        let cell = &state.systems()[target];
        cell.set_rate(previous);
        state.add_log(format!(
            "INFO: Sensor for {} ({}) recalibrated.",
            cell.name(),
            target
        ));
    });
}

fn efficiency_boost(state: &GameState, rng: &mut TaskRng, target: SystemId) {
    let cell = &state.systems()[target];
    let boost = rng.range(5, 15);
    cell.boost(boost);
    state.add_log(format!(
        "EVENT: Unexpected efficiency boost in {} ({})! Value +{}",
        cell.name(),
        target,
        boost
    ));
}

/// Damages a random subset of distinct systems.
fn cosmic_rays(state: &GameState, rng: &mut TaskRng) {
    let n = state.systems().len();
    if n < 2 {
        return;
    }
    let count = 1 + rng.below(n - 1);
    state.add_log("EVENT: Cosmic ray shower detected! Multiple systems affected.");
    let mut pool: Vec<SystemId> = (0..n).collect();
    for _ in 0..count {
        let pick = pool.swap_remove(rng.below(pool.len()));
        let cell = &state.systems()[pick];
        let damage = rng.range(5, 10);
        cell.harm(damage);
        state.add_log(format!(
            "  - {} ({}) took {} damage.",
            cell.name(),
            pick,
            damage
        ));
    }
}
