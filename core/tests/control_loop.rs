//! Control loop tests: quit paths, verdict handling, and command
//! flow through the engine.

use std::sync::Arc;
use std::time::Duration;

use reactor_core::config::GameConfig;
use reactor_core::engine::{GameEngine, Presenter};
use reactor_core::rng::RngBank;
use reactor_core::snapshot::GameSnapshot;
use reactor_core::state::Phase;
use tokio::sync::mpsc;

struct CountingPresenter {
    frames: usize,
}

impl Presenter for CountingPresenter {
    fn frame(&mut self, _snapshot: &GameSnapshot) {
        self.frames += 1;
    }
}

/// Background timers stretched out so only the control loop itself
/// moves the state.
fn calm_config() -> GameConfig {
    GameConfig {
        degradation_tick: Duration::from_secs(600),
        event_interval_min: Duration::from_secs(600),
        event_interval_max: Duration::from_secs(1200),
        survival_duration: Duration::from_secs(600),
        ui_tick: Duration::from_millis(10),
        ..GameConfig::default()
    }
}

#[tokio::test]
async fn quit_ends_the_run_and_yields_a_report() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = GameEngine::new(calm_config(), RngBank::new(0xFEED));
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel(4);
    tx.send("quit".into()).await.unwrap();

    let report = engine.run(rx, &mut presenter).await.unwrap();
    assert_eq!(report.seed, 0xFEED);
    assert_eq!(report.phase, Phase::Running);
    assert_eq!(report.systems.len(), 5);
    // At least the opening frame and the shutdown frame.
    assert!(presenter.frames >= 2);
}

#[tokio::test]
async fn closed_input_is_an_implicit_quit() {
    let mut engine = GameEngine::new(calm_config(), RngBank::new(0xFEE0));
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel::<String>(1);
    drop(tx);

    let report = engine.run(rx, &mut presenter).await.unwrap();
    assert_eq!(report.phase, Phase::Running);
}

/// Commands, parse errors, and rejections all land in the event log.
#[tokio::test]
async fn command_outcomes_reach_the_event_log() {
    let mut engine = GameEngine::new(calm_config(), RngBank::new(0xFEE1));
    let state = Arc::clone(engine.state());
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel(8);
    tx.send("divert 0 0 20".into()).await.unwrap();
    tx.send("launch 1".into()).await.unwrap();
    tx.send("".into()).await.unwrap();
    tx.send("quit".into()).await.unwrap();

    engine.run(rx, &mut presenter).await.unwrap();

    let log = state.snapshot().log;
    assert!(log.iter().any(|e| e.text.contains("must be different")));
    assert!(log.iter().any(|e| e.text.contains("Unknown command: launch")));
    assert!(log.iter().any(|e| e.text.contains("Exiting simulation")));
}

/// Two systems at zero end the run; the loop keeps rendering until
/// the input closes, and the report carries the loss.
#[tokio::test]
async fn two_dead_systems_lose_the_run() {
    let mut engine = GameEngine::new(calm_config(), RngBank::new(0xFEE2));
    let state = Arc::clone(engine.state());
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel::<String>(1);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        state.systems()[0].set_value(0);
        state.systems()[1].set_value(0);
        tokio::time::sleep(Duration::from_millis(250)).await;
        drop(tx);
    });

    let report = engine.run(rx, &mut presenter).await.unwrap();
    assert_eq!(report.phase, Phase::Lost);
}

#[tokio::test]
async fn outlasting_the_window_wins_the_run() {
    let config = GameConfig {
        survival_duration: Duration::from_millis(100),
        ..calm_config()
    };
    let mut engine = GameEngine::new(config, RngBank::new(0xFEE3));
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel::<String>(1);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        drop(tx);
    });

    let report = engine.run(rx, &mut presenter).await.unwrap();
    assert_eq!(report.phase, Phase::Won);
}

/// After a verdict only quit does anything; other commands get the
/// game-over notice.
#[tokio::test]
async fn non_quit_commands_are_refused_after_the_verdict() {
    let config = GameConfig {
        survival_duration: Duration::from_millis(100),
        ..calm_config()
    };
    let mut engine = GameEngine::new(config, RngBank::new(0xFEE4));
    let state = Arc::clone(engine.state());
    let mut presenter = CountingPresenter { frames: 0 };

    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        tx.send("vent 0".into()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send("quit".into()).await.unwrap();
    });

    let report = engine.run(rx, &mut presenter).await.unwrap();
    assert_eq!(report.phase, Phase::Won);
    let log = state.snapshot().log;
    assert!(log
        .iter()
        .any(|e| e.text.contains("Only 'quit' is available")));
}

/// Same seed, same quiet run, same roster in the report.
#[tokio::test]
async fn reports_are_deterministic_for_a_seed() {
    const SEED: u64 = 0xFACE_FEED;
    let mut reports = Vec::new();
    for _ in 0..2 {
        let mut engine = GameEngine::new(calm_config(), RngBank::new(SEED));
        let mut presenter = CountingPresenter { frames: 0 };
        let (tx, rx) = mpsc::channel(1);
        tx.send("quit".into()).await.unwrap();
        reports.push(engine.run(rx, &mut presenter).await.unwrap());
    }
    let (a, b) = (&reports[0], &reports[1]);
    assert_eq!(a.seed, b.seed);
    for (sa, sb) in a.systems.iter().zip(&b.systems) {
        assert_eq!(sa.value, sb.value);
        assert_eq!(sa.name, sb.name);
    }
}
