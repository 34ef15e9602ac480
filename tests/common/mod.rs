//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use source_outline::analysis::{Analyzer, AnalyzerError, AnalyzerRegistry};
use source_outline::config::OutlineConfig;
use source_outline::expand::ExpansionEdit;
use source_outline::host::EditorHost;
use source_outline::model::{DocumentId, StructureItem};
use source_outline::runtime::Runtime;

pub const DEMO: &str = "text/x-demo";
pub const GATED: &str = "text/x-gated";
pub const FAILING: &str = "text/x-failing";

pub const DOC: DocumentId = DocumentId(1);
pub const OTHER: DocumentId = DocumentId(2);

/// Generous upper bound for waiting on the worker
pub const WAIT: Duration = Duration::from_secs(5);

/// Host that records every callback
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub jumps: Vec<usize>,
    pub focus_count: usize,
    pub edits: Vec<(DocumentId, ExpansionEdit)>,
    pub messages: Vec<String>,
}

impl EditorHost for RecordingHost {
    fn move_cursor_to_line_end(&mut self, line: usize) {
        self.jumps.push(line);
    }

    fn focus_editor(&mut self) {
        self.focus_count += 1;
    }

    fn apply_edit(&mut self, document_id: DocumentId, edit: &ExpansionEdit) {
        self.edits.push((document_id, edit.clone()));
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Line-based analyzer for a tiny Python-like language:
/// `name = ...` is a global, `def name(...)` a function (or a method when
/// indented under a class), `class Name` a class.
pub fn demo_analyze(source: &str) -> Result<Vec<StructureItem>, AnalyzerError> {
    let mut items = Vec::new();
    let mut in_class = false;

    for (line, text) in source.lines().enumerate() {
        let indented = text.starts_with(' ') || text.starts_with('\t');
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !indented {
            in_class = false;
        }

        if let Some(rest) = trimmed.strip_prefix("def ") {
            let name = rest.split('(').next().unwrap_or_default().trim();
            if indented && in_class {
                items.push(StructureItem::method(line, name));
            } else if !indented {
                items.push(StructureItem::function(line, name));
            }
        } else if let Some(rest) = trimmed.strip_prefix("class ") {
            let name = rest.trim_end_matches(':').split('(').next().unwrap_or_default();
            items.push(StructureItem::class(line, name.trim()));
            in_class = true;
        } else if !indented {
            if let Some((name, _)) = trimmed.split_once('=') {
                items.push(StructureItem::global(line, name.trim()));
            } else if trimmed.starts_with('!') {
                return Err(AnalyzerError::new(format!("syntax error on line {}", line + 1)));
            }
        }
    }
    Ok(items)
}

/// Demo analyzer that counts its invocations
#[derive(Clone, Default)]
pub struct CountingAnalyzer {
    pub calls: Arc<AtomicUsize>,
}

impl CountingAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Analyzer for CountingAnalyzer {
    fn analyze(&self, source: &str) -> Result<Vec<StructureItem>, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        demo_analyze(source)
    }
}

/// Demo analyzer that blocks until the test releases it, one call per
/// release. Reports each source it starts on.
pub struct GatedAnalyzer {
    release: Mutex<Receiver<()>>,
    started: Mutex<Sender<String>>,
}

/// Test side of a [`GatedAnalyzer`]
pub struct Gate {
    release: Sender<()>,
    pub started: Receiver<String>,
}

impl Gate {
    /// Let one blocked analysis finish
    pub fn open_once(&self) {
        let _ = self.release.send(());
    }

    /// Wait until the analyzer has started on some source
    pub fn wait_started(&self) -> String {
        self.started
            .recv_timeout(WAIT)
            .expect("gated analyzer never started")
    }
}

pub fn gated_analyzer() -> (GatedAnalyzer, Gate) {
    let (release_tx, release_rx) = mpsc::channel();
    let (started_tx, started_rx) = mpsc::channel();
    (
        GatedAnalyzer {
            release: Mutex::new(release_rx),
            started: Mutex::new(started_tx),
        },
        Gate {
            release: release_tx,
            started: started_rx,
        },
    )
}

impl Analyzer for GatedAnalyzer {
    fn analyze(&self, source: &str) -> Result<Vec<StructureItem>, AnalyzerError> {
        let _ = self.started.lock().unwrap().send(source.to_string());
        let _ = self.release.lock().unwrap().recv_timeout(WAIT);
        demo_analyze(source)
    }
}

/// Registry with the demo analyzer and one that always fails
pub fn test_registry() -> AnalyzerRegistry {
    let mut registry = AnalyzerRegistry::new();
    registry.register_fn(DEMO, demo_analyze);
    registry.register_fn(FAILING, |_source: &str| {
        Err::<Vec<StructureItem>, _>(AnalyzerError::new("syntax error on line 1"))
    });
    registry
}

/// Config with a short debounce and no expansion files on disk
pub fn test_config(debounce_ms: u64) -> OutlineConfig {
    OutlineConfig {
        debounce_ms,
        member_indent: 4,
        expansion_dirs: Vec::new(),
    }
}

pub fn test_runtime(debounce_ms: u64) -> Runtime<RecordingHost> {
    runtime_with(test_registry(), debounce_ms)
}

pub fn runtime_with(registry: AnalyzerRegistry, debounce_ms: u64) -> Runtime<RecordingHost> {
    let mut runtime = Runtime::new(test_config(debounce_ms), registry, RecordingHost::default())
        .expect("runtime should start");
    runtime.start();
    runtime
}

/// Pump the runtime until `done` holds or [`WAIT`] passes
pub fn pump_until<F>(runtime: &mut Runtime<RecordingHost>, mut done: F) -> bool
where
    F: FnMut(&Runtime<RecordingHost>) -> bool,
{
    let give_up = std::time::Instant::now() + WAIT;
    loop {
        runtime.pump();
        if done(runtime) {
            return true;
        }
        if std::time::Instant::now() >= give_up {
            return false;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}

/// Collects every event of the subscribed kinds
pub fn record_events(
    runtime: &mut Runtime<RecordingHost>,
    kinds: &[source_outline::events::EventKind],
) -> Arc<Mutex<Vec<source_outline::events::ServiceEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in kinds {
        let sink = Arc::clone(&seen);
        runtime.subscribe(*kind, move |event| sink.lock().unwrap().push(event.clone()));
    }
    seen
}
