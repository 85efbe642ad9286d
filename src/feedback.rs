// src/feedback.rs

//! Terminal feedback: clearing the screen and the one-line status.

use std::fmt;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use tracing::warn;

use crate::resolve::Resolution;
use crate::types::FunctionName;

/// What the operator sees between and during deploys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Watching,
    DeployingFunction(FunctionName),
    DeployingService,
    DeployingAllFunctions,
}

impl Status {
    /// Status announced when dispatching `resolution`.
    pub fn for_resolution(resolution: &Resolution) -> Self {
        match resolution {
            Resolution::SingleTarget(name) => Status::DeployingFunction(name.clone()),
            Resolution::ServiceConfig => Status::DeployingService,
            Resolution::Unmatched => Status::DeployingAllFunctions,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Status::Watching)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Watching => f.write_str("Watching for changes"),
            Status::DeployingFunction(name) => {
                write!(f, "Deploying function {name}. See logs for details")
            }
            Status::DeployingService => f.write_str("Deploying service. See logs for details"),
            Status::DeployingAllFunctions => {
                f.write_str("Deploying all functions. See logs for details")
            }
        }
    }
}

/// Output surface driven by the change loop.
pub trait Feedback: Send {
    fn clear(&mut self);
    fn show(&mut self, status: &Status);
}

/// Feedback on the controlling terminal (stdout).
#[derive(Debug)]
pub struct TerminalFeedback {
    clear_screen: bool,
}

impl TerminalFeedback {
    pub fn new(clear_screen: bool) -> Self {
        Self { clear_screen }
    }

    fn try_clear(&self) -> io::Result<()> {
        let mut out = io::stdout();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn try_show(&self, status: &Status) -> io::Result<()> {
        let mut out = io::stdout();
        let line = status.to_string();
        if status.is_idle() {
            queue!(out, Print(format!("{} {}\n", "…".yellow(), line.yellow())))?;
        } else {
            queue!(out, Print(format!("{} {}\n", "✔".green(), line)))?;
        }
        out.flush()
    }
}

impl Feedback for TerminalFeedback {
    fn clear(&mut self) {
        if !self.clear_screen {
            return;
        }
        if let Err(err) = self.try_clear() {
            warn!(error = %err, "failed to clear terminal");
        }
    }

    fn show(&mut self, status: &Status) {
        if let Err(err) = self.try_show(status) {
            warn!(error = %err, "failed to write status line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_texts_are_stable() {
        assert_eq!(Status::Watching.to_string(), "Watching for changes");
        assert_eq!(
            Status::DeployingFunction("hello".to_string()).to_string(),
            "Deploying function hello. See logs for details"
        );
        assert_eq!(
            Status::DeployingService.to_string(),
            "Deploying service. See logs for details"
        );
        assert_eq!(
            Status::DeployingAllFunctions.to_string(),
            "Deploying all functions. See logs for details"
        );
    }

    #[test]
    fn status_follows_resolution() {
        assert_eq!(
            Status::for_resolution(&Resolution::SingleTarget("a".to_string())),
            Status::DeployingFunction("a".to_string())
        );
        assert_eq!(
            Status::for_resolution(&Resolution::ServiceConfig),
            Status::DeployingService
        );
        assert_eq!(
            Status::for_resolution(&Resolution::Unmatched),
            Status::DeployingAllFunctions
        );
    }
}
