//! Win/loss evaluation, run once per control-loop frame.

use std::time::Duration;

use crate::state::{GameState, Phase};

/// The run is lost once this many systems sit at zero integrity.
pub const LOSS_THRESHOLD: usize = 2;

/// The pure verdict rule. Survival is checked before failure, so a
/// frame where both conditions hold is a win.
pub fn decide(elapsed: Duration, survival: Duration, zero_systems: usize) -> Option<Phase> {
    if elapsed >= survival {
        Some(Phase::Won)
    } else if zero_systems >= LOSS_THRESHOLD {
        Some(Phase::Lost)
    } else {
        None
    }
}

/// Apply the rule to live state. Returns the outcome only for the
/// call that actually ended the run; the transition and its log entry
/// happen exactly once no matter how often this is polled.
pub fn evaluate(state: &GameState) -> Option<Phase> {
    if state.phase() != Phase::Running {
        return None;
    }
    let outcome = decide(
        state.elapsed(),
        state.config().survival_duration,
        state.zero_count(),
    )?;
    if !state.try_finish(outcome) {
        return None;
    }
    match outcome {
        Phase::Won => state.add_log(
            "OBJECTIVE COMPLETE: Survived the critical period! Reactor secure. You win!",
        ),
        Phase::Lost => state.add_log(
            "CATASTROPHIC FAILURE: Multiple systems offline. Meltdown imminent. GAME OVER.",
        ),
        Phase::Running => unreachable!(),
    }
    Some(outcome)
}
