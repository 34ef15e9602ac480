//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod analysis;
mod browser;
mod document;
mod expand;
mod search;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AnalysisService;

pub use analysis::{schedule_analysis, submit_active, update_analysis};
pub use browser::update_browser;
pub use document::update_document;
pub use expand::update_expand;
pub use search::update_search;

/// Main update function - dispatches to sub-handlers
pub fn update(service: &mut AnalysisService, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    let _span = tracing::debug_span!("update", msg = msg_name(&msg)).entered();

    match msg {
        Msg::Document(m) => document::update_document(service, m),
        Msg::Analysis(m) => analysis::update_analysis(service, m),
        Msg::Browser(m) => browser::update_browser(service, m),
        Msg::Search(m) => search::update_search(service, m),
        Msg::Expand(m) => expand::update_expand(service, m),
    }
}

#[cfg(debug_assertions)]
fn msg_name(msg: &Msg) -> &'static str {
    use crate::messages::{AnalysisMsg, DocumentMsg};
    match msg {
        Msg::Document(DocumentMsg::Opened { .. }) => "Document::Opened",
        Msg::Document(DocumentMsg::Activated { .. }) => "Document::Activated",
        Msg::Document(DocumentMsg::TextChanged { .. }) => "Document::TextChanged",
        Msg::Document(DocumentMsg::ContentTypeChanged { .. }) => "Document::ContentTypeChanged",
        Msg::Document(DocumentMsg::Closed { .. }) => "Document::Closed",
        Msg::Analysis(AnalysisMsg::DebounceElapsed { .. }) => "Analysis::DebounceElapsed",
        Msg::Analysis(AnalysisMsg::Completed(_)) => "Analysis::Completed",
        Msg::Analysis(AnalysisMsg::Rejected { .. }) => "Analysis::Rejected",
        Msg::Browser(_) => "Browser",
        Msg::Search(_) => "Search",
        Msg::Expand(_) => "Expand",
    }
}
