//! Content type → analyzer table

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::StructureItem;

/// Error reported by an analyzer for source it cannot handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerError {
    pub message: String,
}

impl AnalyzerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "analysis failed: {}", self.message)
    }
}

impl std::error::Error for AnalyzerError {}

impl From<String> for AnalyzerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for AnalyzerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Turns source text into an ordered outline
///
/// Called on the analysis worker thread, so implementations must not touch
/// editor or UI state. Items must be in document order.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, source: &str) -> Result<Vec<StructureItem>, AnalyzerError>;
}

impl<F> Analyzer for F
where
    F: Fn(&str) -> Result<Vec<StructureItem>, AnalyzerError> + Send + Sync,
{
    fn analyze(&self, source: &str) -> Result<Vec<StructureItem>, AnalyzerError> {
        self(source)
    }
}

/// Maps content types to analyzers
///
/// Registering a second analyzer for a content type replaces the first.
/// Which one wins when two plugins target the same type is up to
/// registration order.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<String, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, content_type: impl Into<String>, analyzer: impl Analyzer + 'static) {
        self.register_shared(content_type, Arc::new(analyzer));
    }

    /// Register a closure; its signature is inferred from the bound
    pub fn register_fn<F>(&mut self, content_type: impl Into<String>, analyzer: F)
    where
        F: Fn(&str) -> Result<Vec<StructureItem>, AnalyzerError> + Send + Sync + 'static,
    {
        self.register(content_type, analyzer);
    }

    /// Register one analyzer for several content types
    pub fn register_all(&mut self, content_types: &[&str], analyzer: impl Analyzer + 'static) {
        let analyzer: Arc<dyn Analyzer> = Arc::new(analyzer);
        for content_type in content_types {
            self.register_shared(*content_type, Arc::clone(&analyzer));
        }
    }

    pub fn register_shared(&mut self, content_type: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        let content_type = content_type.into();
        if self.analyzers.insert(content_type.clone(), analyzer).is_some() {
            tracing::debug!("Replaced analyzer for {}", content_type);
        }
    }

    pub fn lookup(&self, content_type: &str) -> Option<Arc<dyn Analyzer>> {
        self.analyzers.get(content_type).cloned()
    }

    pub fn supports(&self, content_type: &str) -> bool {
        self.analyzers.contains_key(content_type)
    }

    /// Registered content types, sorted
    pub fn content_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.analyzers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("content_types", &self.content_types())
            .finish()
    }
}
