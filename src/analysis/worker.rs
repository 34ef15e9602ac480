//! Background analysis worker
//!
//! A single long-lived thread runs one analyzer call at a time. Results go
//! back to the event loop over the runtime's message channel.

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{AnalysisOutcome, AnalysisRequest, AnalysisResult, Analyzer};
use crate::messages::{AnalysisMsg, Msg};
use crate::model::StructureModel;

/// A request paired with the analyzer resolved for it on the event loop
pub struct AnalysisJob {
    pub request: AnalysisRequest,
    pub analyzer: Arc<dyn Analyzer>,
}

impl AnalysisJob {
    pub fn new(request: AnalysisRequest, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { request, analyzer }
    }

    /// Run the analyzer, turning errors, panics and malformed output into
    /// `Failed`
    pub fn run(&self) -> AnalysisResult {
        let request = &self.request;
        let analyzer = &self.analyzer;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
            analyzer.analyze(&request.source)
        })) {
            Ok(Ok(items)) => match StructureModel::from_items(items) {
                Ok(model) => AnalysisOutcome::Structure(model),
                Err(e) => {
                    tracing::warn!(
                        "Analyzer for {} returned malformed structure: {}",
                        request.content_type,
                        e
                    );
                    AnalysisOutcome::Failed(e.to_string())
                }
            },
            Ok(Err(e)) => {
                tracing::warn!(
                    "Analyzer for {} failed on doc={} rev={}: {}",
                    request.content_type,
                    request.document_id.0,
                    request.revision,
                    e
                );
                AnalysisOutcome::Failed(e.message)
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(
                    "Analyzer for {} panicked on doc={} rev={}: {}",
                    request.content_type,
                    request.document_id.0,
                    request.revision,
                    reason
                );
                AnalysisOutcome::Failed(reason)
            }
        };

        AnalysisResult::for_request(request, outcome)
    }
}

impl fmt::Debug for AnalysisJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisJob")
            .field("document_id", &self.request.document_id)
            .field("revision", &self.request.revision)
            .field("content_type", &self.request.content_type)
            .field("source_len", &self.request.source.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

/// Why a job was not accepted
#[derive(Debug)]
pub enum SubmitError {
    /// An analysis is already running; the job is handed back
    Busy(AnalysisJob),
    /// The worker has shut down
    Disconnected(AnalysisJob),
}

impl SubmitError {
    pub fn into_job(self) -> AnalysisJob {
        match self {
            SubmitError::Busy(job) | SubmitError::Disconnected(job) => job,
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Busy(_) => write!(f, "analysis worker is busy"),
            SubmitError::Disconnected(_) => write!(f, "analysis worker has shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Handle to the analysis thread
pub struct AnalysisWorker {
    jobs: Option<SyncSender<AnalysisJob>>,
    busy: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Spawn the worker. Results are delivered as `Msg::Analysis(Completed)`.
    pub fn spawn(results: Sender<Msg>) -> io::Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::sync_channel::<AnalysisJob>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        let handle = thread::Builder::new()
            .name("analysis-worker".to_string())
            .spawn(move || worker_loop(jobs_rx, results, worker_busy))?;

        tracing::debug!("Started analysis worker");

        Ok(Self {
            jobs: Some(jobs_tx),
            busy,
            handle: Some(handle),
        })
    }

    /// Hand a job to the worker without blocking. Rejected while busy.
    pub fn submit(&self, job: AnalysisJob) -> Result<(), SubmitError> {
        let Some(jobs) = &self.jobs else {
            return Err(SubmitError::Disconnected(job));
        };

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy(job));
        }

        match jobs.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => {
                self.busy.store(false, Ordering::Release);
                Err(SubmitError::Busy(job))
            }
            Err(TrySendError::Disconnected(job)) => {
                self.busy.store(false, Ordering::Release);
                Err(SubmitError::Disconnected(job))
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Close the job queue and wait for the thread to exit. An analyzer
    /// that is still running is waited for.
    pub fn shutdown(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Analysis worker thread panicked");
            }
            tracing::debug!("Analysis worker stopped");
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(jobs: Receiver<AnalysisJob>, results: Sender<Msg>, busy: Arc<AtomicBool>) {
    for job in jobs {
        tracing::debug!(
            "Analysing doc={} rev={} ({} bytes)",
            job.request.document_id.0,
            job.request.revision,
            job.request.source.len()
        );
        let result = job.run();

        // Clear before sending so a resubmission triggered by this result
        // is accepted
        busy.store(false, Ordering::Release);
        if results.send(Msg::Analysis(AnalysisMsg::Completed(result))).is_err() {
            tracing::debug!("Result channel closed, stopping analysis worker");
            break;
        }
    }
}
