// src/engine/core.rs

//! Pure change-loop state machine.
//!
//! [`CoreLoop`] consumes [`LoopEvent`]s and produces:
//! - an updated state (`Idle` or `Dispatching`)
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for reading
//! events from channels, executing dispatches and driving the terminal.
//! The core has no Tokio types and performs no IO, so every transition can
//! be unit tested directly.

use std::collections::VecDeque;
use std::path::PathBuf;

use tracing::debug;

use crate::catalog::Catalog;
use crate::feedback::Status;
use crate::resolve::{resolve, Resolution};

/// Input to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Started,
    PathChanged(PathBuf),
    DispatchFinished,
    ShutdownRequested,
}

/// Command produced by the core, executed in order by the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    ClearScreen,
    Announce(Status),
    /// Run this strategy to completion, then report `DispatchFinished`.
    Dispatch(Resolution),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Dispatching,
}

/// Change-loop core.
///
/// At most one dispatch is outstanding at any time. Paths reported while a
/// dispatch is running are queued and handled one by one, in arrival order,
/// once it finishes. Nothing is coalesced: three saves mean three deploys.
#[derive(Debug)]
pub struct CoreLoop {
    catalog: Catalog,
    state: LoopState,
    pending: VecDeque<PathBuf>,
}

impl CoreLoop {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: LoopState::Idle,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn step(&mut self, event: LoopEvent) -> CoreStep {
        match event {
            LoopEvent::Started => {
                self.state = LoopState::Idle;
                CoreStep::running(watching_commands())
            }
            LoopEvent::PathChanged(path) => match self.state {
                LoopState::Idle => CoreStep::running(self.begin_dispatch(path)),
                LoopState::Dispatching => {
                    debug!(?path, queued = self.pending.len() + 1, "dispatch in progress; queueing change");
                    self.pending.push_back(path);
                    CoreStep::running(Vec::new())
                }
            },
            LoopEvent::DispatchFinished => match self.pending.pop_front() {
                Some(path) => CoreStep::running(self.begin_dispatch(path)),
                None => {
                    self.state = LoopState::Idle;
                    CoreStep::running(watching_commands())
                }
            },
            LoopEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    fn begin_dispatch(&mut self, path: PathBuf) -> Vec<CoreCommand> {
        let resolution = resolve(&path, &self.catalog);
        debug!(?path, %resolution, "resolved change");
        self.state = LoopState::Dispatching;
        vec![
            CoreCommand::Announce(Status::for_resolution(&resolution)),
            CoreCommand::Dispatch(resolution),
        ]
    }
}

fn watching_commands() -> Vec<CoreCommand> {
    vec![
        CoreCommand::ClearScreen,
        CoreCommand::Announce(Status::Watching),
    ]
}
