//! Render-ready snapshots of the game state.
//!
//! A snapshot is an owned copy: the presenter works from it without
//! touching any simulation lock, and the summary report serializes it
//! to JSON.

use std::time::Duration;

use serde::Serialize;

use crate::config::{CRITICAL_THRESHOLD, WARNING_THRESHOLD};
use crate::state::{LogEntry, Phase};
use crate::types::SystemId;

/// Display severity of a system reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub id: SystemId,
    pub name: &'static str,
    pub value: i32,
    pub frozen: bool,
}

impl SystemSnapshot {
    pub fn severity(&self) -> Severity {
        if self.value <= CRITICAL_THRESHOLD {
            Severity::Critical
        } else if self.value <= WARNING_THRESHOLD {
            Severity::Warning
        } else {
            Severity::Stable
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionSnapshot {
    pub label: String,
    pub remaining: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub systems: Vec<SystemSnapshot>,
    pub repair_kits: u32,
    pub elapsed: Duration,
    pub survival_duration: Duration,
    pub action: Option<ActionSnapshot>,
    pub log: Vec<LogEntry>,
    pub phase: Phase,
}
