//! The control loop.
//!
//! `GameEngine::run` owns the frame cadence: render, evaluate the
//! verdict, then wait on either the UI tick or the next input line.
//! Degradation and random events run on background tasks that share
//! the state and stop on the shutdown signal. The manual override's
//! stall is served inline, so the screen deliberately freezes while
//! it engages.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::actions;
use crate::command::{Command, ParseError};
use crate::config::GameConfig;
use crate::degradation;
use crate::error::{EngineResult, Rejection};
use crate::evaluator;
use crate::events;
use crate::rng::{RngBank, TaskRng, TaskSlot};
use crate::snapshot::{GameSnapshot, SystemSnapshot};
use crate::state::{GameState, Phase};
use crate::types::Seed;

/// Receives one frame per UI tick (and one final frame at shutdown).
pub trait Presenter: Send {
    fn frame(&mut self, snapshot: &GameSnapshot);
}

/// End-of-run summary. `phase` stays `Running` when the player quits
/// before a verdict.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub seed: Seed,
    pub phase: Phase,
    pub elapsed_secs: f64,
    pub repair_kits: u32,
    pub systems: Vec<SystemSnapshot>,
}

pub struct GameEngine {
    state: Arc<GameState>,
    rng_bank: RngBank,
}

impl GameEngine {
    pub fn new(config: GameConfig, rng_bank: RngBank) -> Self {
        let mut setup = rng_bank.for_task(TaskSlot::Setup);
        let state = Arc::new(GameState::new(config, &mut setup));
        Self { state, rng_bank }
    }

    /// Shared handle to the live state, mainly for tests and tooling.
    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// Drive the game until the player quits or `input` closes.
    /// Closing the input channel counts as an implicit quit; a won or
    /// lost game keeps rendering until the player does quit.
    pub async fn run(
        &mut self,
        mut input: mpsc::Receiver<String>,
        presenter: &mut dyn Presenter,
    ) -> EngineResult<GameReport> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let degradation_task = tokio::spawn(degradation::run(
            Arc::clone(&self.state),
            shutdown_rx.clone(),
        ));
        let events_task = tokio::spawn(events::run(
            Arc::clone(&self.state),
            self.rng_bank.for_task(TaskSlot::Events),
            shutdown_rx,
        ));
        let mut actions_rng = self.rng_bank.for_task(TaskSlot::Actions);

        log::debug!(
            "control loop starting (seed {:#x})",
            self.rng_bank.master_seed()
        );
        self.state
            .add_log("SYSTEM BOOT: Reactor control online. Good luck, engineer.");

        let mut ui = tokio::time::interval(self.state.config().ui_tick);
        ui.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            presenter.frame(&self.state.snapshot());
            if let Some(outcome) = evaluator::evaluate(&self.state) {
                log::debug!("run ended: {outcome:?}");
            }
            tokio::select! {
                _ = ui.tick() => {}
                line = input.recv() => {
                    let Some(line) = line else { break };
                    if !self.handle_line(&line, &mut actions_rng).await {
                        break;
                    }
                }
            }
        }

        let _ = shutdown_tx.send(true);
        self.state.add_log("Shutting down auxiliary systems...");
        presenter.frame(&self.state.snapshot());
        degradation_task.await?;
        events_task.await?;
        Ok(self.report())
    }

    /// Returns false when the player quit.
    async fn handle_line(&self, line: &str, rng: &mut TaskRng) -> bool {
        match Command::parse(line) {
            Ok(None) => true,
            Ok(Some(Command::Quit)) => {
                self.state.add_log("Exiting simulation...");
                false
            }
            Ok(Some(cmd)) => {
                if self.state.phase() != Phase::Running {
                    self.state.add_log("Game ended. Only 'quit' is available.");
                } else if let Err(rejection) = self.dispatch(cmd, rng).await {
                    self.reject(rejection);
                }
                true
            }
            Err(err) => {
                self.reject_parse(err);
                true
            }
        }
    }

    async fn dispatch(&self, cmd: Command, rng: &mut TaskRng) -> Result<(), Rejection> {
        match cmd {
            Command::Stabilize { id } => actions::stabilize(&self.state, id),
            Command::Divert { from, to, amount } => {
                actions::divert(&self.state, from, to, amount)
            }
            Command::Vent { id } => actions::vent(&self.state, id, rng),
            Command::Override { id } => actions::manual_override(&self.state, id, rng).await,
            // Quit is handled before dispatch.
            Command::Quit => Ok(()),
        }
    }

    fn reject(&self, rejection: Rejection) {
        log::debug!("command rejected: {rejection:?}");
        self.state.add_log(rejection.to_string());
    }

    fn reject_parse(&self, err: ParseError) {
        self.state.add_log(err.to_string());
    }

    fn report(&self) -> GameReport {
        let snapshot = self.state.snapshot();
        GameReport {
            seed: self.rng_bank.master_seed(),
            phase: snapshot.phase,
            elapsed_secs: snapshot.elapsed.as_secs_f64(),
            repair_kits: snapshot.repair_kits,
            systems: snapshot.systems,
        }
    }
}
