//! The degradation scheduler.
//!
//! A fixed-interval background task that decays every non-frozen
//! system each tick and raises a one-shot log alert when a system
//! first reaches zero. The alert re-arms once the system is seen
//! above zero again, so a system oscillating around zero logs once
//! per excursion rather than once per tick.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::MIN_SYSTEM_VALUE;
use crate::state::{GameState, Phase};

/// Runs until shutdown fires or the game leaves `Running`.
pub async fn run(state: Arc<GameState>, mut shutdown: watch::Receiver<bool>) {
    let tick = state.config().degradation_tick;
    let mut ticker = interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut at_zero = vec![false; state.systems().len()];
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }
        if state.phase() != Phase::Running {
            break;
        }
        for cell in state.systems() {
            cell.degrade();
            let zero_now = cell.value() <= MIN_SYSTEM_VALUE;
            if zero_now && !at_zero[cell.id()] {
                state.add_log(format!(
                    "CRITICAL: System {} ({}) has reached ZERO integrity!",
                    cell.name(),
                    cell.id()
                ));
            }
            at_zero[cell.id()] = zero_now;
        }
    }
    log::debug!("degradation task exiting");
}
