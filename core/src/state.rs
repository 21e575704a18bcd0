//! Shared game state.
//!
//! Two layers of locking: each `SystemCell` has its own mutex, and the
//! simulation-wide fields (event log, repair kits, the exclusive
//! action slot, phase) share one mutex here. No critical section holds
//! both layers, and none performs I/O or awaits.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;

use crate::config::{GameConfig, MIN_SYSTEM_VALUE, SYSTEM_NAMES};
use crate::error::Rejection;
use crate::rng::TaskRng;
use crate::snapshot::{ActionSnapshot, GameSnapshot, SystemSnapshot};
use crate::system::SystemCell;
use crate::types::SystemId;

/// Lifecycle of a run. Transitions out of `Running` are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Running,
    Won,
    Lost,
}

/// One line of the in-game event log, stamped at insertion time.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Wall-clock HH:MM:SS, for display only.
    pub at: String,
    pub text: String,
}

/// The single in-flight exclusive action, if any.
#[derive(Debug)]
struct ActiveAction {
    label: String,
    ends_at: Instant,
}

#[derive(Debug)]
struct SharedFields {
    event_log: VecDeque<LogEntry>,
    repair_kits: u32,
    action: Option<ActiveAction>,
    phase: Phase,
}

pub struct GameState {
    config: GameConfig,
    systems: Vec<SystemCell>,
    shared: Mutex<SharedFields>,
    started_at: Instant,
}

impl GameState {
    /// Build the system roster with randomized initial values (80-99)
    /// and degradation rates (2-4) drawn from the setup stream.
    pub fn new(config: GameConfig, rng: &mut TaskRng) -> Self {
        debug_assert!(config.system_count <= SYSTEM_NAMES.len());
        let systems = SYSTEM_NAMES
            .iter()
            .take(config.system_count)
            .enumerate()
            .map(|(id, name)| SystemCell::new(id, name, rng.range(80, 100), rng.range(2, 5)))
            .collect();
        let shared = SharedFields {
            event_log: VecDeque::with_capacity(config.log_capacity),
            repair_kits: config.initial_repair_kits,
            action: None,
            phase: Phase::Running,
        };
        Self {
            config,
            systems,
            shared: Mutex::new(shared),
            started_at: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedFields> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn systems(&self) -> &[SystemCell] {
        &self.systems
    }

    pub fn system(&self, id: SystemId) -> Option<&SystemCell> {
        self.systems.get(id)
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Append a timestamped entry, evicting the oldest past capacity.
    pub fn add_log(&self, text: impl Into<String>) {
        let entry = LogEntry {
            at: Local::now().format("%H:%M:%S").to_string(),
            text: text.into(),
        };
        let mut s = self.lock();
        if s.event_log.len() >= self.config.log_capacity {
            s.event_log.pop_front();
        }
        s.event_log.push_back(entry);
    }

    pub fn repair_kits(&self) -> u32 {
        self.lock().repair_kits
    }

    /// Claim the single exclusive-action slot, spending one repair
    /// kit. Busy is checked before kits, and nothing is consumed on
    /// rejection; both checks and the kit decrement happen under one
    /// lock so concurrent claims cannot double-spend.
    pub fn claim_exclusive(&self, label: String, duration: Duration) -> Result<(), Rejection> {
        let mut s = self.lock();
        let now = Instant::now();
        if matches!(&s.action, Some(a) if now < a.ends_at) {
            return Err(Rejection::Busy);
        }
        if s.repair_kits == 0 {
            return Err(Rejection::NoRepairKits);
        }
        s.repair_kits -= 1;
        s.action = Some(ActiveAction {
            label,
            ends_at: now + duration,
        });
        Ok(())
    }

    /// Whether an exclusive action is in flight and not yet expired.
    pub fn is_busy(&self) -> bool {
        let s = self.lock();
        matches!(&s.action, Some(a) if Instant::now() < a.ends_at)
    }

    pub fn clear_action(&self) {
        self.lock().action = None;
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// One-way transition out of `Running`. Returns true only for the
    /// call that actually performed the transition.
    pub fn try_finish(&self, outcome: Phase) -> bool {
        debug_assert!(outcome != Phase::Running);
        let mut s = self.lock();
        if s.phase != Phase::Running {
            return false;
        }
        s.phase = outcome;
        true
    }

    /// Systems currently at zero integrity.
    pub fn zero_count(&self) -> usize {
        self.systems
            .iter()
            .filter(|c| c.value() <= MIN_SYSTEM_VALUE)
            .count()
    }

    /// A render-ready copy of everything the presenter needs. The
    /// shared fields are copied under one lock acquisition; system
    /// readings are taken per-cell afterwards.
    pub fn snapshot(&self) -> GameSnapshot {
        let (repair_kits, action, log, phase) = {
            let s = self.lock();
            let action = s.action.as_ref().map(|a| ActionSnapshot {
                label: a.label.clone(),
                remaining: a.ends_at.saturating_duration_since(Instant::now()),
            });
            (
                s.repair_kits,
                action,
                s.event_log.iter().cloned().collect(),
                s.phase,
            )
        };
        let systems = self
            .systems
            .iter()
            .map(|c| {
                let r = c.read();
                SystemSnapshot {
                    id: c.id(),
                    name: c.name(),
                    value: r.value,
                    frozen: r.frozen,
                }
            })
            .collect();
        GameSnapshot {
            systems,
            repair_kits,
            elapsed: self.elapsed(),
            survival_duration: self.config.survival_duration,
            action,
            log,
            phase,
        }
    }
}
