//! Error types.
//!
//! RULE: a refused player command is a `Rejection`, not an error.
//! Rejections are written to the in-game event log and leave the
//! simulation untouched. `EngineError` is reserved for real faults
//! in the control loop itself.

use crate::types::SystemId;
use thiserror::Error;

/// Why a player command was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Error: Invalid system id {0}.")]
    InvalidSystem(SystemId),

    #[error("Cannot start new action: Player busy.")]
    Busy,

    #[error("Cannot stabilize: No repair kits left!")]
    NoRepairKits,

    #[error("Error: Source and destination must be different systems.")]
    SameSystem,

    #[error("Error: Divert amount must be between {0} and {1}.")]
    AmountOutOfRange(i32, i32),

    #[error("Error: Not enough capacity in {name} ({id}) to divert {amount}.")]
    InsufficientCapacity {
        id: SystemId,
        name: String,
        amount: i32,
    },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type EngineResult<T> = Result<T, EngineError>;
