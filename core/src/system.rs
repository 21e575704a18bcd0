//! A single reactor system and its lock.
//!
//! RULE: each system guards its own fields with its own mutex, and no
//! critical section ever takes two system locks at once. Multi-system
//! effects (divert, cosmic rays) touch one lock at a time, so a value
//! total may be transiently inconsistent mid-effect but each system
//! is always internally valid.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::{MAX_SYSTEM_VALUE, MIN_SYSTEM_VALUE};
use crate::types::SystemId;

/// A coherent point-in-time read of one system, taken under its lock.
#[derive(Debug, Clone, Copy)]
pub struct SystemReading {
    pub value: i32,
    pub degradation_rate: i32,
    pub frozen: bool,
}

#[derive(Debug)]
struct SystemFields {
    value: i32,
    degradation_rate: i32,
    frozen: bool,
}

/// One reactor system: identity outside the lock, mutable state inside.
#[derive(Debug)]
pub struct SystemCell {
    id: SystemId,
    name: &'static str,
    fields: Mutex<SystemFields>,
}

impl SystemCell {
    pub fn new(id: SystemId, name: &'static str, value: i32, degradation_rate: i32) -> Self {
        Self {
            id,
            name,
            fields: Mutex::new(SystemFields {
                value: value.clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE),
                degradation_rate,
                frozen: false,
            }),
        }
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> MutexGuard<'_, SystemFields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn value(&self) -> i32 {
        self.lock().value
    }

    pub fn read(&self) -> SystemReading {
        let f = self.lock();
        SystemReading {
            value: f.value,
            degradation_rate: f.degradation_rate,
            frozen: f.frozen,
        }
    }

    /// One decay step. Frozen systems do not decay.
    pub fn degrade(&self) {
        let mut f = self.lock();
        if f.frozen {
            return;
        }
        f.value = (f.value - f.degradation_rate).clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE);
    }

    pub fn boost(&self, amount: i32) {
        let mut f = self.lock();
        f.value = (f.value + amount).clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE);
    }

    pub fn harm(&self, amount: i32) {
        let mut f = self.lock();
        f.value = (f.value - amount).clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE);
    }

    /// Clamp and set the value directly. Stabilize completion and the
    /// override jackpot both land on a fixed value.
    pub fn set_value(&self, value: i32) {
        self.lock().value = value.clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE);
    }

    pub fn set_frozen(&self, frozen: bool) {
        self.lock().frozen = frozen;
    }

    /// Raise the degradation rate by `delta` and return the rate that
    /// was in effect before the change, so the caller can schedule a
    /// restore to it.
    pub fn raise_rate(&self, delta: i32) -> i32 {
        let mut f = self.lock();
        let previous = f.degradation_rate;
        f.degradation_rate += delta;
        previous
    }

    pub fn set_rate(&self, rate: i32) {
        self.lock().degradation_rate = rate;
    }

    /// Withdraw `amount`, but only if at least `amount + reserve`
    /// is present before the draw. Check and withdrawal happen under
    /// one lock so a concurrent harm cannot overdraw the system.
    pub fn try_drain(&self, amount: i32, reserve: i32) -> bool {
        let mut f = self.lock();
        if f.value < amount + reserve {
            return false;
        }
        f.value = (f.value - amount).clamp(MIN_SYSTEM_VALUE, MAX_SYSTEM_VALUE);
        true
    }
}
