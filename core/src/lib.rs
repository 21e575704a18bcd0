//! reactor-core — the Reactor Ops simulation engine.
//!
//! RULES:
//!   - All randomness flows through `RngBank` streams; no task owns a
//!     shared generator.
//!   - Each system guards its own fields with its own lock, the
//!     simulation-wide fields share one lock, and no critical section
//!     takes both or awaits.
//!   - Refused player input is a `Rejection` written to the in-game
//!     log, never an error.

pub mod actions;
pub mod command;
pub mod config;
pub mod degradation;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod system;
pub mod types;
