//! Service model - the complete state of the outline service
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod browser;
pub mod document;
pub mod search;
pub mod structure;

pub use browser::{BrowserEntry, SymbolBrowser};
pub use document::{Document, DocumentId, DocumentTracker, TextEdit};
pub use search::{matches_query, SearchOverlay};
pub use structure::{
    ItemKind, ItemStyle, MalformedStructure, PropertyAccessors, StructureItem, StructureModel,
};

use crate::analysis::{AnalysisScheduler, AnalyzerRegistry};
use crate::config::OutlineConfig;
use crate::expand::ExpansionLoader;

/// What the browser currently reflects
///
/// Always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutlineState {
    /// Nothing analysed yet, or no active document
    #[default]
    Empty,
    Ready(StructureModel),
    /// The active document has no analyzer for this content type
    Unsupported(String),
}

impl OutlineState {
    pub fn structure(&self) -> Option<&StructureModel> {
        match self {
            OutlineState::Ready(model) => Some(model),
            _ => None,
        }
    }
}

/// The complete service model
#[derive(Debug)]
pub struct AnalysisService {
    pub config: OutlineConfig,
    pub registry: AnalyzerRegistry,
    pub documents: DocumentTracker,
    pub scheduler: AnalysisScheduler,
    /// Current outline
    pub outline: OutlineState,
    /// Document the current outline was computed for
    pub outline_document: Option<DocumentId>,
    /// Reason of the last failed analysis, cleared on success or switch
    pub last_failure: Option<String>,
    pub browser: SymbolBrowser,
    /// Open search overlay, if any
    pub search: Option<SearchOverlay>,
    pub expansions: ExpansionLoader,
}

impl AnalysisService {
    pub fn new(config: OutlineConfig, registry: AnalyzerRegistry) -> Self {
        let scheduler = AnalysisScheduler::new(config.debounce());
        let browser = SymbolBrowser::new(config.member_indent);
        let expansions = ExpansionLoader::new(config.expansion_dirs.clone());
        tracing::debug!(
            "Analysis service created with {} analyzers, debounce {}ms",
            registry.len(),
            config.debounce_ms
        );
        Self {
            config,
            registry,
            documents: DocumentTracker::new(),
            scheduler,
            outline: OutlineState::Empty,
            outline_document: None,
            last_failure: None,
            browser,
            search: None,
            expansions,
        }
    }

    /// Current structure, if one is shown
    pub fn structure(&self) -> Option<&StructureModel> {
        self.outline.structure()
    }

    /// Swap in a new structure and refresh the browser from it
    pub fn set_structure(&mut self, document_id: DocumentId, model: StructureModel) {
        self.browser.set_structure(&model);
        self.outline = OutlineState::Ready(model);
        self.outline_document = Some(document_id);
        self.last_failure = None;
    }

    /// Show the "no analyzer" placeholder
    pub fn set_unsupported(&mut self, document_id: DocumentId, content_type: &str) {
        self.browser.set_unsupported(content_type);
        self.outline = OutlineState::Unsupported(content_type.to_string());
        self.outline_document = Some(document_id);
        self.last_failure = None;
    }

    /// Forget the outline (no active document)
    pub fn clear_outline(&mut self) {
        self.browser.clear();
        self.outline = OutlineState::Empty;
        self.outline_document = None;
        self.last_failure = None;
    }

    /// Whether the shown outline is unsupported
    pub fn is_unsupported(&self) -> bool {
        matches!(self.outline, OutlineState::Unsupported(_))
    }
}
