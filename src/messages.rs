//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Host signals arrive
//! as [`DocumentMsg`]s; the worker reports back with [`AnalysisMsg`]s.

use crate::analysis::AnalysisResult;
use crate::model::{DocumentId, TextEdit};

/// Signals from the host editor about its documents
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// A document was opened (not necessarily active)
    Opened {
        document_id: DocumentId,
        content_type: String,
        text: String,
    },
    /// The active view switched to this document
    Activated { document_id: DocumentId },
    /// A document's text changed
    TextChanged {
        document_id: DocumentId,
        edit: TextEdit,
    },
    /// A document's content type changed (e.g. after "save as")
    ContentTypeChanged {
        document_id: DocumentId,
        content_type: String,
    },
    /// A document was closed
    Closed { document_id: DocumentId },
}

/// Analysis pipeline messages
#[derive(Debug, Clone)]
pub enum AnalysisMsg {
    /// A debounce timer elapsed
    DebounceElapsed { generation: u64 },
    /// The worker finished a request
    Completed(AnalysisResult),
    /// The worker refused a request because it was busy
    Rejected { document_id: DocumentId },
}

/// Symbol browser messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserMsg {
    SelectPrevious,
    SelectNext,
    /// Activate the entry at a row (click / Enter on a row)
    Activate { index: usize },
    /// Activate the selected row
    ActivateSelected,
}

/// Search overlay messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMsg {
    /// Open the overlay over the current outline
    Open,
    /// Close without jumping
    Close,
    /// Replace the whole query
    SetQuery(String),
    InsertChar(char),
    DeleteBackward,
    SelectPrevious,
    SelectNext,
    /// Jump to the selected match and close
    Confirm,
}

/// Snippet expansion messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMsg {
    /// Expand the word (and argument) at a cursor position of the active document
    ExpandAtCursor { line: usize, column: usize },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Document(DocumentMsg),
    Analysis(AnalysisMsg),
    Browser(BrowserMsg),
    Search(SearchMsg),
    Expand(ExpandMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn opened(document_id: DocumentId, content_type: &str, text: &str) -> Self {
        Msg::Document(DocumentMsg::Opened {
            document_id,
            content_type: content_type.to_string(),
            text: text.to_string(),
        })
    }

    pub fn activated(document_id: DocumentId) -> Self {
        Msg::Document(DocumentMsg::Activated { document_id })
    }

    /// Whole-buffer replacement
    pub fn text_replaced(document_id: DocumentId, text: &str) -> Self {
        Msg::Document(DocumentMsg::TextChanged {
            document_id,
            edit: TextEdit::Replace(text.to_string()),
        })
    }

    pub fn text_inserted(document_id: DocumentId, char_idx: usize, text: &str) -> Self {
        Msg::Document(DocumentMsg::TextChanged {
            document_id,
            edit: TextEdit::Insert {
                char_idx,
                text: text.to_string(),
            },
        })
    }
}
