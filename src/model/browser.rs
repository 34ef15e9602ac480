//! Symbol browser state
//!
//! A flat, navigable list of the current outline in document order.

use super::structure::{ItemKind, ItemStyle, StructureModel};

/// One visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    /// 0-indexed anchor line
    pub line: usize,
    /// Indented display label
    pub label: String,
    pub kind: ItemKind,
    pub style: ItemStyle,
}

#[derive(Debug, Clone)]
pub struct SymbolBrowser {
    entries: Vec<BrowserEntry>,
    /// Set when the active document has no analyzer
    unsupported: Option<String>,
    selected_index: Option<usize>,
    member_indent: usize,
}

impl SymbolBrowser {
    pub fn new(member_indent: usize) -> Self {
        Self {
            entries: Vec::new(),
            unsupported: None,
            selected_index: None,
            member_indent,
        }
    }

    /// Rebuild rows from a model snapshot
    pub fn set_structure(&mut self, model: &StructureModel) {
        self.unsupported = None;
        self.entries = model
            .items()
            .iter()
            .map(|item| {
                let style = item.kind().style(self.member_indent);
                BrowserEntry {
                    line: item.line(),
                    label: format!("{}{}", " ".repeat(style.indent), item.long_name()),
                    kind: item.kind(),
                    style,
                }
            })
            .collect();

        if let Some(idx) = self.selected_index {
            if idx >= self.entries.len() {
                self.selected_index = self.entries.len().checked_sub(1);
            }
        }
    }

    /// Show the "no analyzer" placeholder instead of rows
    pub fn set_unsupported(&mut self, content_type: &str) {
        self.entries.clear();
        self.selected_index = None;
        self.unsupported = Some(content_type.to_string());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected_index = None;
        self.unsupported = None;
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    /// `(line, label)` pairs in document order
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|e| (e.line, e.label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unsupported_content_type(&self) -> Option<&str> {
        self.unsupported.as_deref()
    }

    /// Text shown in place of the list when there is no analyzer
    pub fn placeholder(&self) -> Option<String> {
        self.unsupported
            .as_ref()
            .map(|content_type| format!("No analyser for\n{}", content_type))
    }

    /// Jumping is disabled while unsupported or empty
    pub fn jump_enabled(&self) -> bool {
        self.unsupported.is_none() && !self.entries.is_empty()
    }

    /// Anchor line for a row, if jumping is possible
    pub fn entry_line(&self, index: usize) -> Option<usize> {
        if !self.jump_enabled() {
            return None;
        }
        self.entries.get(index).map(|e| e.line)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected_index = Some(index);
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(idx) = self.selected_index {
            if idx > 0 {
                self.selected_index = Some(idx - 1);
            }
        } else if !self.entries.is_empty() {
            self.selected_index = Some(0);
        }
    }

    pub fn select_next(&mut self) {
        let total = self.entries.len();
        if let Some(idx) = self.selected_index {
            if idx + 1 < total {
                self.selected_index = Some(idx + 1);
            }
        } else if total > 0 {
            self.selected_index = Some(0);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructureItem;

    fn model() -> StructureModel {
        StructureModel::from_items(vec![
            StructureItem::global(0, "x"),
            StructureItem::class(2, "A"),
            StructureItem::method(3, "run").with_long_name("run(self)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_rows_in_document_order_with_member_indent() {
        let mut browser = SymbolBrowser::new(4);
        browser.set_structure(&model());
        let rows: Vec<_> = browser.rows().collect();
        assert_eq!(rows, vec![(0, "x"), (2, "A"), (3, "    run(self)")]);
    }

    #[test]
    fn test_unsupported_disables_jump() {
        let mut browser = SymbolBrowser::new(4);
        browser.set_structure(&model());
        assert_eq!(browser.entry_line(1), Some(2));

        browser.set_unsupported("text/plain");
        assert!(browser.is_empty());
        assert!(!browser.jump_enabled());
        assert_eq!(browser.entry_line(0), None);
        assert_eq!(
            browser.placeholder().as_deref(),
            Some("No analyser for\ntext/plain")
        );

        browser.set_structure(&model());
        assert!(browser.jump_enabled());
        assert!(browser.placeholder().is_none());
    }

    #[test]
    fn test_selection_navigation() {
        let mut browser = SymbolBrowser::new(4);
        browser.select_next();
        assert_eq!(browser.selected_index(), None);

        browser.set_structure(&model());
        browser.select_next();
        assert_eq!(browser.selected_index(), Some(0));
        browser.select_next();
        browser.select_next();
        browser.select_next();
        assert_eq!(browser.selected_index(), Some(2));
        browser.select_previous();
        assert_eq!(browser.selected_index(), Some(1));
    }

    #[test]
    fn test_selection_clamped_when_model_shrinks() {
        let mut browser = SymbolBrowser::new(4);
        browser.set_structure(&model());
        browser.select(2);
        browser.set_structure(&StructureModel::from_items(vec![StructureItem::global(0, "x")]).unwrap());
        assert_eq!(browser.selected_index(), Some(0));
        browser.set_structure(&StructureModel::default());
        assert_eq!(browser.selected_index(), None);
    }
}
