//! Terminal entry point.
//!
//! Reads one command per line from stdin and redraws the whole frame after
//! every change. A reader thread feeds lines into a channel so the main loop
//! can keep pumping load completions while the user is idle.
//!
//! ```text
//! ┌──────────────┐  lines   ┌──────────────────────────────┐
//! │ stdin reader │ ───────► │ main loop                    │
//! └──────────────┘          │  parse → App::dispatch       │
//!                           │  idle  → App::pump           │
//! ┌──────────────┐ results  │  dirty → ui::render → stdout │
//! │ worker pool  │ ───────► │                              │
//! └──────────────┘          └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! shelfdesk [--config=shelfdesk.toml] [--key=value ...]
//! ```
//!
//! Any [`Config`] key can be given as `--key=value`; arguments override the
//! file.
//!
//! # Commands
//!
//! - `j` / `k`: next / previous row
//! - `n` / `p`: next / previous page
//! - `/text`: search for `text` (`/` alone clears the search)
//! - `f`: search the next field
//! - `x`: leave search and clear the query
//! - `r`: reload the current view
//! - `d`: delete the selected record (librarians only)
//! - `1`-`5`: switch view
//! - `q`: quit

#![allow(clippy::multiple_crate_versions)]

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use shelfdesk::{initialize, observability, ui, App, Config, Event, Result, ShelfdeskError};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

const IDLE_TICK: Duration = Duration::from_millis(50);

fn main() {
    if let Err(err) = run() {
        eprintln!("shelfdesk: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = load_config(std::env::args().skip(1))?;
    observability::init_tracing(&config);
    tracing::debug!(?config, "starting shelfdesk");

    let mut client = Client::new(initialize(&config)?);
    let lines = spawn_stdin_reader()?;
    client.render()?;

    while !client.app.should_quit() {
        match lines.recv_timeout(IDLE_TICK) {
            Ok(line) => client.update(&line),
            Err(RecvTimeoutError::Timeout) => {
                if client.app.pump() > 0 {
                    client.dirty = true;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if client.dirty {
            client.render()?;
        }
    }

    tracing::debug!("shelfdesk exiting");
    Ok(())
}

/// Merges `--config=<file>` with `--key=value` overrides.
fn load_config(args: impl Iterator<Item = String>) -> Result<Config> {
    let mut file = None;
    let mut overrides = BTreeMap::new();

    for arg in args {
        let Some((key, value)) = arg.strip_prefix("--").and_then(|a| a.split_once('=')) else {
            return Err(ShelfdeskError::Config(format!(
                "unexpected argument {arg:?}, expected --key=value"
            )));
        };
        if key == "config" {
            file = Some(value.to_string());
        } else {
            overrides.insert(key.replace('-', "_"), value.to_string());
        }
    }

    let mut map = match file {
        Some(path) => {
            let contents = std::fs::read_to_string(shelfdesk::infrastructure::expand_tilde(&path))?;
            Config::toml_map(&contents)?
        }
        None => BTreeMap::new(),
    };
    map.extend(overrides);
    Ok(Config::from_map(&map))
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (sender, receiver) = unbounded();
    thread::Builder::new()
        .name("shelfdesk-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(receiver)
}

struct Client {
    app: App,
    dirty: bool,
}

impl Client {
    const fn new(app: App) -> Self {
        Self { app, dirty: true }
    }

    fn update(&mut self, line: &str) {
        let Some(event) = parse_command(&self.app, line) else {
            tracing::debug!(line, "unrecognized command");
            self.dirty = true;
            return;
        };

        match self.app.dispatch(&event) {
            Ok(redraw) => self.dirty |= redraw,
            Err(err) => {
                tracing::warn!(error = %err, ?event, "event failed");
                eprintln!("shelfdesk: {err}");
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (rows, cols) = terminal_size();
        let frame = ui::render(&self.app, rows, cols);
        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        self.dirty = false;
        Ok(())
    }
}

fn parse_command(app: &App, line: &str) -> Option<Event> {
    if let Some(query) = line.strip_prefix('/') {
        return Some(Event::SetQuery(query.to_string()));
    }

    let event = match line.trim() {
        "j" => Event::SelectNext,
        "k" => Event::SelectPrevious,
        "n" => Event::NextPage,
        "p" => Event::PreviousPage,
        "f" => Event::CycleField,
        "x" => Event::ExitSearch,
        "r" => Event::Refresh,
        "d" => Event::DeleteSelected,
        "q" => Event::Quit,
        other => {
            let mut chars = other.chars();
            let key = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Event::ShowView(app.view_for_key(key)?.to_string())
        }
    };
    Some(event)
}

fn terminal_size() -> (usize, usize) {
    let dimension = |name: &str, fallback: usize| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(fallback)
    };
    (dimension("LINES", 24), dimension("COLUMNS", 100))
}
