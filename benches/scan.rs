//! Benchmarks for delimiter scanning, outline filtering and analysis
//!
//! Run with: cargo bench scan

use ropey::Rope;
use source_outline::analysis::Analyzer;
use source_outline::analyzers::PythonAnalyzer;
use source_outline::model::{matches_query, SearchOverlay, StructureItem, StructureModel};
use source_outline::scan::{match_backward, match_forward, word_and_argument_at, Position};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// `call(` followed by `depth` nested calls spread over several lines
fn nested_call(depth: usize) -> String {
    let mut text = String::from("call(");
    for i in 0..depth {
        text.push_str(&format!("inner_{}(\"a)\", 'b(',\n", i));
    }
    text.push_str(&")".repeat(depth + 1));
    text
}

fn python_module(classes: usize) -> String {
    let mut text = String::from("import os\n\nLIMIT = 10\n\n");
    for i in 0..classes {
        text.push_str(&format!(
            "class Model{i}:\n    def __init__(self, a, b=1):\n        self.a = a\n\n    def get(self):\n        return self.a\n\n    value = property(get)\n\n\ndef helper_{i}(*args, **kwargs):\n    pass\n\n"
        ));
    }
    text
}

fn outline(items: usize) -> StructureModel {
    let items = (0..items)
        .map(|i| match i % 3 {
            0 => StructureItem::class(i, format!("Widget{}", i)),
            1 => StructureItem::method(i, format!("render_{}", i)),
            _ => StructureItem::function(i, format!("make_widget_{}", i)),
        })
        .collect();
    StructureModel::from_items(items).unwrap()
}

// ============================================================================
// Delimiter matching
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn scan_forward_nested(bencher: divan::Bencher, depth: usize) {
    let rope = Rope::from_str(&nested_call(depth));
    bencher.bench(|| match_forward(divan::black_box(&rope), Position::new(0, 4)));
}

#[divan::bench(args = [10, 100, 1_000])]
fn scan_backward_nested(bencher: divan::Bencher, depth: usize) {
    let rope = Rope::from_str(&nested_call(depth));
    let last = rope.len_lines() - 1;
    let close = Position::new(last, depth);
    bencher.bench(|| match_backward(divan::black_box(&rope), close));
}

#[divan::bench(args = [10, 100, 1_000])]
fn word_and_argument_after_call(bencher: divan::Bencher, depth: usize) {
    let rope = Rope::from_str(&nested_call(depth));
    let last = rope.len_lines() - 1;
    let cursor = Position::new(last, depth + 1);
    bencher.bench(|| word_and_argument_at(divan::black_box(&rope), cursor));
}

// ============================================================================
// Outline filtering
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn filter_outline(bencher: divan::Bencher, items: usize) {
    let model = outline(items);
    bencher.bench(|| {
        model
            .items()
            .iter()
            .filter(|item| matches_query(item, divan::black_box("widget_9")))
            .count()
    });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn search_overlay_typing(bencher: divan::Bencher, items: usize) {
    let model = outline(items);
    bencher.bench(|| {
        let mut overlay = SearchOverlay::open(model.clone());
        for ch in "render_4".chars() {
            overlay.insert_char(ch);
        }
        divan::black_box(overlay.visible_count())
    });
}

// ============================================================================
// Python analysis
// ============================================================================

#[divan::bench(args = [10, 100, 500])]
fn analyze_python(bencher: divan::Bencher, classes: usize) {
    let source = python_module(classes);
    let analyzer = PythonAnalyzer::new();
    bencher.bench(|| analyzer.analyze(divan::black_box(&source)));
}
