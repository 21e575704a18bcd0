//! Player actions: validation, instant effects, and the timed
//! stabilize flow.
//!
//! Every function returns `Ok(())` when the command was accepted
//! (even if its in-game effect was a logged no-op) and a `Rejection`
//! when it was refused. Rejections never mutate the simulation.

use std::sync::Arc;

use tokio::time::sleep;

use crate::config::{CRITICAL_THRESHOLD, MAX_SYSTEM_VALUE};
use crate::error::Rejection;
use crate::rng::TaskRng;
use crate::state::GameState;
use crate::system::SystemCell;
use crate::types::SystemId;

pub const DIVERT_MIN: i32 = 10;
pub const DIVERT_MAX: i32 = 30;

fn lookup(state: &GameState, id: SystemId) -> Result<&SystemCell, Rejection> {
    state.system(id).ok_or(Rejection::InvalidSystem(id))
}

/// Freeze the target, spend a repair kit, and restore the system to
/// full integrity after the configured delay. The completion runs on
/// a background task so the control loop keeps serving commands.
pub fn stabilize(state: &Arc<GameState>, id: SystemId) -> Result<(), Rejection> {
    let cell = lookup(state, id)?;
    let duration = state.config().stabilize_duration;
    state.claim_exclusive(
        format!("Stabilizing {} ({})", cell.name(), id),
        duration,
    )?;
    cell.set_frozen(true);
    state.add_log(format!(
        "Commencing stabilization of {} ({}). This will take time.",
        cell.name(),
        id
    ));

    let state = Arc::clone(state);
    tokio::spawn(async move {
        sleep(duration).await;
        let cell = &state.systems()[id];
        cell.set_value(MAX_SYSTEM_VALUE);
        cell.set_frozen(false);
        state.clear_action();
        state.add_log(format!(
            "SUCCESS: {} ({}) stabilization complete. Value restored to {}.",
            cell.name(),
            id,
            MAX_SYSTEM_VALUE
        ));
    });
    Ok(())
}

/// Move integrity from one system to another. The source must keep a
/// reserve of half the critical threshold after the check, and the
/// withdrawal is atomic so the transfer conserves total integrity
/// (up to clamping at the destination).
pub fn divert(state: &GameState, from: SystemId, to: SystemId, amount: i32) -> Result<(), Rejection> {
    let source = lookup(state, from)?;
    let dest = lookup(state, to)?;
    if from == to {
        return Err(Rejection::SameSystem);
    }
    if !(DIVERT_MIN..=DIVERT_MAX).contains(&amount) {
        return Err(Rejection::AmountOutOfRange(DIVERT_MIN, DIVERT_MAX));
    }
    if state.is_busy() {
        return Err(Rejection::Busy);
    }
    if !source.try_drain(amount, CRITICAL_THRESHOLD / 2) {
        return Err(Rejection::InsufficientCapacity {
            id: from,
            name: source.name().to_string(),
            amount,
        });
    }
    dest.boost(amount);
    state.add_log(format!(
        "Diverted {} power from {} ({}) to {} ({}).",
        amount,
        source.name(),
        from,
        dest.name(),
        to
    ));
    Ok(())
}

/// Instant boost scaled to the integrity deficit, with a 35% chance
/// of backflow damage to some other system. A system already at full
/// integrity logs a no-op and never rolls for backflow.
pub fn vent(state: &GameState, id: SystemId, rng: &mut TaskRng) -> Result<(), Rejection> {
    let cell = lookup(state, id)?;
    if state.is_busy() {
        return Err(Rejection::Busy);
    }
    let current = cell.value();
    if current >= MAX_SYSTEM_VALUE {
        state.add_log(format!(
            "System {} ({}) is already optimal. Venting had no effect.",
            cell.name(),
            id
        ));
        return Ok(());
    }
    let boost = ((MAX_SYSTEM_VALUE - current) / 2).max(10);
    cell.boost(boost);
    state.add_log(format!(
        "Emergency vent on {} ({}). Value increased by {}.",
        cell.name(),
        id,
        boost
    ));

    if rng.percent(35) {
        let n = state.systems().len();
        // Pick uniformly among the systems other than the vent target.
        let other = if n > 1 {
            let mut pick = rng.below(n - 1);
            if pick >= id {
                pick += 1;
            }
            pick
        } else {
            id
        };
        let victim = &state.systems()[other];
        let damage = rng.range(5, 20);
        victim.harm(damage);
        state.add_log(format!(
            "WARNING: Vent caused backflow! {} ({}) damaged by {}.",
            victim.name(),
            other,
            damage
        ));
    }
    Ok(())
}

/// A gamble: stalls the whole control loop for the configured delay,
/// then restores the system fully (10%), fizzles (30%), or deals
/// heavy damage (60%).
pub async fn manual_override(
    state: &GameState,
    id: SystemId,
    rng: &mut TaskRng,
) -> Result<(), Rejection> {
    let cell = lookup(state, id)?;
    if state.is_busy() {
        return Err(Rejection::Busy);
    }
    state.add_log(format!(
        "Attempting DANGEROUS manual override on {} ({})...",
        cell.name(),
        id
    ));
    sleep(state.config().override_delay).await;

    let roll = rng.below(100);
    if roll < 10 {
        cell.set_value(MAX_SYSTEM_VALUE);
        state.add_log(format!(
            "OVERRIDE SUCCESS: {} ({}) fully stabilized!",
            cell.name(),
            id
        ));
    } else if roll < 40 {
        state.add_log(format!(
            "OVERRIDE NEUTRAL: {} ({}) override had no significant effect.",
            cell.name(),
            id
        ));
    } else {
        let damage = rng.range(30, 70);
        cell.harm(damage);
        state.add_log(format!(
            "OVERRIDE FAILED: {} ({}) took critical damage! Value -{}",
            cell.name(),
            id,
            damage
        ));
    }
    Ok(())
}
