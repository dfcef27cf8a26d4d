//! Scripted window operations
//!
//! A scenario is a line-based script driving a `WindowManager`, used by the
//! command-line driver to exercise flows without a host application:
//!
//! ```text
//! # comments and blank lines are ignored
//! open Lobby
//! open Shop parent=Lobby
//! wait 50
//! close Shop keep
//! close-all-and-open Battle
//! show
//! ```
//!
//! `keep` turns a destroying close into a hide.

use crate::window::{ManagerSnapshot, WindowId, WindowManager};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open {
        id: WindowId,
        parent: Option<WindowId>,
    },
    Close {
        id: WindowId,
        destroy: bool,
    },
    CloseWindow {
        id: WindowId,
    },
    CloseAll {
        destroy: bool,
    },
    CloseAllAndOpen {
        id: WindowId,
        parent: Option<WindowId>,
        destroy: bool,
    },
    Touch(bool),
    /// Apply load results that arrived so far
    Pump,
    /// Let loads progress for a while, then pump
    Wait(Duration),
    /// Report the manager state
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` expects a window id")]
    MissingId { line: usize, command: String },

    #[error("line {line}: unexpected argument `{argument}`")]
    UnexpectedArgument { line: usize, argument: String },

    #[error("line {line}: invalid value `{value}`")]
    InvalidValue { line: usize, value: String },
}

/// Optional trailing arguments shared by the open/close commands.
#[derive(Default)]
struct Flags {
    parent: Option<WindowId>,
    keep: bool,
}

fn parse_flags<'a>(
    line: usize,
    args: impl Iterator<Item = &'a str>,
    allow_parent: bool,
    allow_keep: bool,
) -> Result<Flags, ScenarioError> {
    let mut flags = Flags::default();
    for arg in args {
        if let Some(parent) = arg.strip_prefix("parent=").filter(|_| allow_parent) {
            if parent.is_empty() {
                return Err(ScenarioError::InvalidValue {
                    line,
                    value: arg.to_string(),
                });
            }
            flags.parent = Some(WindowId::new(parent));
        } else if arg == "keep" && allow_keep {
            flags.keep = true;
        } else {
            return Err(ScenarioError::UnexpectedArgument {
                line,
                argument: arg.to_string(),
            });
        }
    }
    Ok(flags)
}

fn require_id(
    line: usize,
    command: &str,
    words: &mut std::str::SplitWhitespace<'_>,
) -> Result<WindowId, ScenarioError> {
    words
        .next()
        .map(WindowId::new)
        .ok_or_else(|| ScenarioError::MissingId {
            line,
            command: command.to_string(),
        })
}

fn parse_line(line: usize, text: &str) -> Result<Option<Step>, ScenarioError> {
    let text = text.split('#').next().unwrap_or("").trim();
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let step = match command {
        "open" => {
            let id = require_id(line, command, &mut words)?;
            let flags = parse_flags(line, words, true, false)?;
            Step::Open {
                id,
                parent: flags.parent,
            }
        }
        "close" => {
            let id = require_id(line, command, &mut words)?;
            let flags = parse_flags(line, words, false, true)?;
            Step::Close {
                id,
                destroy: !flags.keep,
            }
        }
        "close-window" => {
            let id = require_id(line, command, &mut words)?;
            parse_flags(line, words, false, false)?;
            Step::CloseWindow { id }
        }
        "close-all" => {
            let flags = parse_flags(line, words, false, true)?;
            Step::CloseAll {
                destroy: !flags.keep,
            }
        }
        "close-all-and-open" => {
            let id = require_id(line, command, &mut words)?;
            let flags = parse_flags(line, words, true, true)?;
            Step::CloseAllAndOpen {
                id,
                parent: flags.parent,
                destroy: !flags.keep,
            }
        }
        "touch" => {
            let value = words.next().unwrap_or("");
            let enabled = match value {
                "on" => true,
                "off" => false,
                _ => {
                    return Err(ScenarioError::InvalidValue {
                        line,
                        value: value.to_string(),
                    })
                }
            };
            parse_flags(line, words, false, false)?;
            Step::Touch(enabled)
        }
        "pump" => {
            parse_flags(line, words, false, false)?;
            Step::Pump
        }
        "wait" => {
            let value = words.next().unwrap_or("");
            let millis: u64 = value.parse().map_err(|_| ScenarioError::InvalidValue {
                line,
                value: value.to_string(),
            })?;
            parse_flags(line, words, false, false)?;
            Step::Wait(Duration::from_millis(millis))
        }
        "show" => {
            parse_flags(line, words, false, false)?;
            Step::Show
        }
        other => {
            return Err(ScenarioError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };

    Ok(Some(step))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    steps: Vec<Step>,
}

impl Scenario {
    pub fn parse(source: &str) -> Result<Self, ScenarioError> {
        let mut steps = Vec::new();
        for (index, text) in source.lines().enumerate() {
            if let Some(step) = parse_line(index + 1, text)? {
                steps.push(step);
            }
        }
        Ok(Self { steps })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Failed to parse scenario: {}", path.display()))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step against the manager.
    ///
    /// `show` hands the current snapshot to `report`. After the last step the
    /// runner keeps pumping until no load is outstanding or `settle_timeout`
    /// elapses. Returns `false` if loads were still pending at that point.
    pub async fn run<F>(&self, manager: &mut WindowManager, settle_timeout: Duration, mut report: F) -> bool
    where
        F: FnMut(&ManagerSnapshot),
    {
        for step in &self.steps {
            debug!("Scenario step: {:?}", step);
            match step {
                Step::Wait(duration) => {
                    tokio::time::sleep(*duration).await;
                    manager.pump();
                }
                Step::Pump => {
                    tokio::task::yield_now().await;
                    manager.pump();
                }
                Step::Show => {
                    manager.pump();
                    report(&manager.snapshot());
                }
                other => apply(manager, other),
            }
        }

        settle(manager, settle_timeout).await
    }
}

/// Apply a step that needs no waiting.
pub fn apply(manager: &mut WindowManager, step: &Step) {
    match step {
        Step::Open { id, parent } => manager.open(id, parent.clone(), None),
        Step::Close { id, destroy } => manager.close(id, *destroy),
        Step::CloseWindow { id } => manager.close_window(id),
        Step::CloseAll { destroy } => manager.close_all(*destroy),
        Step::CloseAllAndOpen {
            id,
            parent,
            destroy,
        } => manager.close_all_and_open(id, parent.clone(), None, *destroy),
        Step::Touch(enabled) => manager.set_touch(*enabled),
        Step::Pump => {
            manager.pump();
        }
        Step::Wait(_) | Step::Show => {}
    }
}

/// Pump until no load is outstanding or the timeout elapses.
pub async fn settle(manager: &mut WindowManager, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        manager.pump();
        if manager.pending_loads() == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!(
                "{} window load(s) still pending after {:?}",
                manager.pending_loads(),
                timeout
            );
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
