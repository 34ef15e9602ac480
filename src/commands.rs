//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them: timers, worker submission, host calls.

use crate::analysis::AnalysisJob;
use crate::events::ServiceEvent;
use crate::expand::ExpansionEdit;
use crate::model::DocumentId;

/// Commands returned by update functions
#[derive(Debug)]
pub enum Cmd {
    /// No command
    None,
    /// Browser or overlay contents changed
    Redraw,
    /// Multiple commands to execute
    Batch(Vec<Cmd>),

    // === Analysis Commands ===
    /// Start debounce timer for analysis
    /// After delay_ms, sends Msg::Analysis(DebounceElapsed)
    DebouncedAnalysis { generation: u64, delay_ms: u64 },
    /// Run analysis in the background worker
    /// Sends Msg::Analysis(Completed) when done
    RunAnalysis(AnalysisJob),

    // === Host Commands ===
    /// Move the cursor of the active view to the end of a line
    JumpToLineEnd { line: usize },
    /// Give keyboard focus back to the editing surface
    FocusEditor,
    /// Apply an edit to a document
    ApplyEdit {
        document_id: DocumentId,
        edit: ExpansionEdit,
    },
    /// Show a transient, non-fatal message
    ShowMessage(String),

    // === Events ===
    /// Publish an event to subscribers
    Notify(ServiceEvent),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Collapse optional commands into one, dropping the empty ones
    pub fn combine(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .flatten()
            .filter(|cmd| !matches!(cmd, Cmd::None))
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Analysis commands don't need immediate redraw - Completed triggers redraw
            Cmd::DebouncedAnalysis { .. } => false,
            Cmd::RunAnalysis(_) => false,
            // The host redraws its own view
            Cmd::JumpToLineEnd { .. } => false,
            Cmd::FocusEditor => false,
            Cmd::ApplyEdit { .. } => false,
            Cmd::ShowMessage(_) => false,
            Cmd::Notify(_) => false,
        }
    }

    /// Jump to a line and hand focus back to the editor
    pub fn jump_to(line: usize) -> Self {
        Cmd::Batch(vec![
            Cmd::JumpToLineEnd { line },
            Cmd::FocusEditor,
            Cmd::Redraw,
        ])
    }
}
