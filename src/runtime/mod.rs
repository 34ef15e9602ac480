//! Runtime module - the event loop around the update functions
//!
//! This module contains the single-threaded driver for the service:
//! - `timer` - the debounce deadline
//!
//! The runtime owns the [`AnalysisService`], the worker thread, the event
//! bus and the host. It dispatches messages through [`update`], executes
//! the resulting commands, and drains worker results on its own turn.

mod timer;

pub use timer::DebounceTimer;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::analysis::{
    AnalysisOutcome, AnalysisResult, AnalysisWorker, AnalyzerRegistry, SubmitError,
};
use crate::commands::Cmd;
use crate::config::OutlineConfig;
use crate::events::{EventBus, EventKind, ServiceEvent, SubscriptionId};
use crate::host::EditorHost;
use crate::messages::{AnalysisMsg, Msg};
use crate::model::AnalysisService;
use crate::update::update;

pub struct Runtime<H: EditorHost> {
    service: AnalysisService,
    host: H,
    worker: AnalysisWorker,
    events: EventBus,
    timer: DebounceTimer,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    shut_down: bool,
}

impl<H: EditorHost> Runtime<H> {
    pub fn new(config: OutlineConfig, registry: AnalyzerRegistry, host: H) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let worker =
            AnalysisWorker::spawn(msg_tx.clone()).context("failed to start analysis worker")?;

        Ok(Self {
            service: AnalysisService::new(config, registry),
            host,
            worker,
            events: EventBus::new(),
            timer: DebounceTimer::default(),
            msg_tx,
            msg_rx,
            shut_down: false,
        })
    }

    /// Announce readiness to subscribers
    pub fn start(&mut self) {
        tracing::info!(
            "Outline service started ({} analyzers)",
            self.service.registry.len()
        );
        self.events.publish(&ServiceEvent::Initialized);
    }

    /// Sender for messages produced off the event loop (file watchers, host
    /// threads). They are handled on the next [`pump`](Self::pump).
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn service(&self) -> &AnalysisService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut AnalysisService {
        &mut self.service
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&ServiceEvent) + Send + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Run one message through the update loop. Returns true if the
    /// browser or overlay needs redrawing.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        if self.shut_down {
            tracing::debug!("Ignoring message after shutdown");
            return false;
        }
        match update(&mut self.service, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }

            Cmd::DebouncedAnalysis {
                generation,
                delay_ms,
            } => {
                self.timer.arm(generation, Duration::from_millis(delay_ms));
            }

            Cmd::RunAnalysis(job) => match self.worker.submit(job) {
                Ok(()) => {}
                Err(SubmitError::Busy(job)) => {
                    let _ = self.msg_tx.send(Msg::Analysis(AnalysisMsg::Rejected {
                        document_id: job.request.document_id,
                    }));
                }
                Err(e @ SubmitError::Disconnected(_)) => {
                    tracing::error!("{}", e);
                    let job = e.into_job();
                    let result = AnalysisResult::for_request(
                        &job.request,
                        AnalysisOutcome::Failed("analysis worker has shut down".to_string()),
                    );
                    let _ = self
                        .msg_tx
                        .send(Msg::Analysis(AnalysisMsg::Completed(result)));
                }
            },

            Cmd::JumpToLineEnd { line } => self.host.move_cursor_to_line_end(line),
            Cmd::FocusEditor => self.host.focus_editor(),
            Cmd::ApplyEdit { document_id, edit } => self.host.apply_edit(document_id, &edit),
            Cmd::ShowMessage(message) => self.host.show_message(&message),

            Cmd::Notify(event) => self.events.publish(&event),
        }
    }

    /// Fire a due debounce timer and handle every queued message
    pub fn pump(&mut self) -> bool {
        let mut needs_redraw = false;
        if let Some(generation) = self.timer.take_due(Instant::now()) {
            needs_redraw |= self.dispatch(Msg::Analysis(AnalysisMsg::DebounceElapsed {
                generation,
            }));
        }
        while let Ok(msg) = self.msg_rx.try_recv() {
            needs_redraw |= self.dispatch(msg);
        }
        needs_redraw
    }

    /// Nothing armed, running, or waiting to be applied
    pub fn is_idle(&self) -> bool {
        self.service.scheduler.is_idle() && !self.worker.is_busy()
    }

    /// Earliest time [`pump`](Self::pump) has timer work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Pump until idle or until `timeout` passes. Returns true if idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let give_up = Instant::now() + timeout;
        loop {
            self.pump();
            if self.is_idle() || self.shut_down {
                return self.is_idle();
            }

            let now = Instant::now();
            if now >= give_up {
                tracing::debug!("Runtime still busy after {:?}", timeout);
                return false;
            }
            let mut wait = give_up - now;
            if let Some(deadline) = self.timer.deadline() {
                wait = wait.min(deadline.saturating_duration_since(now));
            }

            match self.msg_rx.recv_timeout(wait) {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return self.is_idle(),
            }
        }
    }

    /// Publish `Shutdown`, drop all subscribers and stop the worker.
    ///
    /// Waits for an analysis still in progress. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.events.publish(&ServiceEvent::Shutdown);
        self.events.clear();
        self.timer.clear();
        self.worker.shutdown();
        tracing::info!("Outline service stopped");
    }
}

impl<H: EditorHost> Drop for Runtime<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
