// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dispatch::Dispatcher;
use crate::errors::Result;
use crate::feedback::Feedback;
use crate::resolve::Resolution;
use crate::types::ServiceFailurePolicy;

use super::core::CoreLoop;
use super::{CoreCommand, LoopEvent, RuntimeEvent, RuntimeOptions};

/// Drives the change-loop core in response to `RuntimeEvent`s and delegates
/// deploys to a [`Dispatcher`] and status output to a [`Feedback`].
///
/// Events are read one at a time and every dispatch is awaited before the
/// next event is read, so two dispatches never overlap. Events that arrive
/// meanwhile wait in the channel.
pub struct Runtime<F: Feedback> {
    core: CoreLoop,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    dispatcher: Dispatcher,
    feedback: F,
    options: RuntimeOptions,
}

impl<F: Feedback> fmt::Debug for Runtime<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<F: Feedback> Runtime<F> {
    pub fn new(
        core: CoreLoop,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        dispatcher: Dispatcher,
        feedback: F,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            core,
            event_rx,
            dispatcher,
            feedback,
            options,
        }
    }

    /// Main event loop.
    ///
    /// Returns when shutdown is requested or the event channel closes, or
    /// with an error when a full-service deploy fails under
    /// [`ServiceFailurePolicy::Propagate`].
    pub async fn run(mut self) -> Result<()> {
        info!("slswatch runtime started");

        if !self.drive(LoopEvent::Started).await? {
            return Ok(());
        }

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            let event = match event {
                RuntimeEvent::PathChanged { path } => LoopEvent::PathChanged(path),
                RuntimeEvent::ShutdownRequested => LoopEvent::ShutdownRequested,
            };

            if !self.drive(event).await? {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Feed one event into the core and execute the resulting commands,
    /// including follow-up steps after each dispatch. Returns whether the
    /// loop should keep running.
    async fn drive(&mut self, event: LoopEvent) -> Result<bool> {
        let mut step = self.core.step(event);
        loop {
            let mut dispatched = false;
            for command in step.commands {
                dispatched |= self.execute_command(command).await?;
            }
            if !step.keep_running {
                return Ok(false);
            }
            if !dispatched {
                return Ok(true);
            }
            step = self.core.step(LoopEvent::DispatchFinished);
        }
    }

    /// Execute a single command from the core. Returns true if it was a
    /// dispatch.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<bool> {
        match command {
            CoreCommand::ClearScreen => {
                self.feedback.clear();
                Ok(false)
            }
            CoreCommand::Announce(status) => {
                info!(%status, "status");
                self.feedback.show(&status);
                Ok(false)
            }
            CoreCommand::Dispatch(resolution) => {
                self.dispatch(resolution).await?;
                Ok(true)
            }
        }
    }

    async fn dispatch(&mut self, resolution: Resolution) -> Result<()> {
        match self.dispatcher.dispatch(&resolution).await {
            Ok(()) => Ok(()),
            Err(err) if self.options.service_failure == ServiceFailurePolicy::KeepWatching => {
                error!(error = %err, %resolution, "deploy failed; still watching");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
