//! reactor-term: the interactive terminal front-end for Reactor Ops.
//!
//! Usage:
//!   reactor-term
//!   reactor-term --seed 12345
//!   reactor-term --seed 12345 --summary-json
//!
//! Reads commands line-by-line from stdin and redraws the full screen
//! on every engine frame. EOF on stdin quits the game.

use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor, execute,
    style::Stylize,
    terminal::{self, ClearType},
};
use tokio::sync::mpsc;

use reactor_core::config::GameConfig;
use reactor_core::engine::{GameEngine, Presenter};
use reactor_core::rng::RngBank;
use reactor_core::snapshot::{GameSnapshot, Severity, SystemSnapshot};
use reactor_core::state::Phase;

const BAR_WIDTH: usize = 20;

struct TerminalPresenter {
    out: io::Stdout,
}

impl TerminalPresenter {
    fn new() -> Self {
        Self { out: io::stdout() }
    }

    fn render(&mut self, snap: &GameSnapshot) -> io::Result<()> {
        execute!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        let mut out = self.out.lock();

        writeln!(out, "{}", "--- REACTOR CONTROL TERMINAL ---".cyan().bold())?;
        writeln!(
            out,
            "Time Elapsed: {} / {}   Repair Kits: {}",
            format_clock(snap.elapsed),
            format_clock(snap.survival_duration),
            snap.repair_kits
        )?;
        match snap.phase {
            Phase::Running => {}
            Phase::Won => writeln!(out, "{}", "STATUS: REACTOR SECURE".green().bold())?,
            Phase::Lost => writeln!(out, "{}", "STATUS: MELTDOWN".red().bold())?,
        }
        writeln!(out)?;

        writeln!(out, "{}", "SYSTEM STATUS:".yellow())?;
        for sys in &snap.systems {
            let line = system_line(sys);
            match sys.severity() {
                Severity::Critical => writeln!(out, "{}", line.red())?,
                Severity::Warning => writeln!(out, "{}", line.yellow())?,
                Severity::Stable => writeln!(out, "{}", line.green())?,
            }
        }
        writeln!(out)?;

        if let Some(action) = &snap.action {
            writeln!(
                out,
                "{}",
                format!(
                    "CURRENT ACTION: {} ({:.1}s left)",
                    action.label,
                    action.remaining.as_secs_f64()
                )
                .magenta()
            )?;
            writeln!(out)?;
        }

        writeln!(out, "{}", "EVENT LOG:".yellow())?;
        for entry in &snap.log {
            let line = format!("[{}] {}", entry.at, entry.text);
            match log_tone(&entry.text) {
                LogTone::Alert => writeln!(out, "{}", line.red())?,
                LogTone::Caution => writeln!(out, "{}", line.yellow())?,
                LogTone::Good => writeln!(out, "{}", line.green())?,
                LogTone::Plain => writeln!(out, "{line}")?,
            }
        }
        writeln!(out)?;

        writeln!(
            out,
            "{}",
            "Commands: stabilize <id> | divert <from> <to> <amt> | vent <id> | override <id> | quit"
                .cyan()
        )?;
        write!(out, "Enter command: ")?;
        out.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn frame(&mut self, snapshot: &GameSnapshot) {
        // A failed draw (e.g. closed stdout) is not worth killing the
        // simulation over.
        if let Err(e) = self.render(snapshot) {
            log::warn!("frame render failed: {e}");
        }
    }
}

fn system_line(sys: &SystemSnapshot) -> String {
    let filled = (sys.value.max(0) as usize * BAR_WIDTH) / 100;
    let bar: String = "=".repeat(filled) + &"-".repeat(BAR_WIDTH - filled);
    let frozen = if sys.frozen { " [STABILIZING]" } else { "" };
    format!(
        "[{}] {:<17} {:>3}/100 [{}]{}",
        sys.id, sys.name, sys.value, bar, frozen
    )
}

fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

enum LogTone {
    Alert,
    Caution,
    Good,
    Plain,
}

/// Color is inferred from the text alone; the log stores no severity.
fn log_tone(text: &str) -> LogTone {
    let t = text.to_lowercase();
    if ["critical", "failed", "catastrophic", "meltdown"]
        .iter()
        .any(|k| t.contains(k))
    {
        LogTone::Alert
    } else if ["warning", "event:", "error", "cannot"]
        .iter()
        .any(|k| t.contains(k))
    {
        LogTone::Caution
    } else if ["success", "complete", "boost", "win"]
        .iter()
        .any(|k| t.contains(k))
    {
        LogTone::Good
    } else {
        LogTone::Plain
    }
}

/// Blocking stdin reader on a plain thread; lines are bridged into
/// the async control loop. Dropping the sender on EOF is what makes
/// Ctrl-D an implicit quit.
fn spawn_stdin_reader(tx: mpsc::Sender<String>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let summary_json = args.iter().any(|a| a == "--summary-json");
    let bank = match parse_arg::<u64>(&args, "--seed") {
        Some(seed) => RngBank::new(seed),
        None => RngBank::from_entropy(),
    };
    log::info!("starting run (seed {:#x})", bank.master_seed());

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_reader(tx);

    let mut engine = GameEngine::new(GameConfig::default(), bank);
    let mut presenter = TerminalPresenter::new();
    let report = engine.run(rx, &mut presenter).await?;

    println!();
    if summary_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("All reactor systems offline. Goodbye, engineer.");
    }
    Ok(())
}
