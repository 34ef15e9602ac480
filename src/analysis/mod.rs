//! Structure analysis pipeline
//!
//! ## Architecture
//!
//! ```text
//! Document Edit → Cmd::DebouncedAnalysis → (debounce timer)
//!              → Msg::Analysis(DebounceElapsed) → Cmd::RunAnalysis
//!              → (worker thread) → Msg::Analysis(Completed) → Cmd::Redraw
//! ```
//!
//! The scheduler allows one analysis in flight. Edits that arrive while the
//! worker is busy are coalesced into a single follow-up request, and results
//! for a document that is no longer active are dropped.

mod registry;
mod scheduler;
mod worker;

pub use registry::{Analyzer, AnalyzerError, AnalyzerRegistry};
pub use scheduler::{AnalysisScheduler, Completion, SchedulerState, Schedule, DEFAULT_DEBOUNCE_MS};
pub use worker::{AnalysisJob, AnalysisWorker, SubmitError};

use crate::model::{DocumentId, StructureModel};

/// Everything the worker needs to analyse one document revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub document_id: DocumentId,
    pub revision: u64,
    pub content_type: String,
    pub source: String,
}

/// What an analysis produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The analyzer produced a structure (possibly empty)
    Structure(StructureModel),
    /// No analyzer is registered for the content type
    Unsupported(String),
    /// The analyzer failed, panicked, or returned malformed data
    Failed(String),
}

/// Result of one analysis, tagged with the identity it was computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub document_id: DocumentId,
    pub revision: u64,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn for_request(request: &AnalysisRequest, outcome: AnalysisOutcome) -> Self {
        Self {
            document_id: request.document_id,
            revision: request.revision,
            outcome,
        }
    }
}
