//! Filter-as-you-type overlay over an outline snapshot
//!
//! The overlay keeps its own handle on the model it was opened with, so a
//! re-analysis landing while it is open does not shift rows under the user.

use super::structure::{StructureItem, StructureModel};

#[derive(Debug, Clone)]
pub struct SearchOverlay {
    snapshot: StructureModel,
    query: String,
    /// Indices into `snapshot` that match the query
    matches: Vec<usize>,
    selected: usize,
}

/// Case-insensitive substring match against the long label
pub fn matches_query(item: &StructureItem, query: &str) -> bool {
    query.is_empty() || item.long_name().to_lowercase().contains(&query.to_lowercase())
}

impl SearchOverlay {
    pub fn open(snapshot: StructureModel) -> Self {
        let matches = (0..snapshot.len()).collect();
        Self {
            snapshot,
            query: String::new(),
            matches,
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> &StructureModel {
        &self.snapshot
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.query.push(ch);
        self.refilter();
    }

    pub fn delete_backward(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        let query = &self.query;
        let matches = self
            .snapshot
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| matches_query(item, query))
            .map(|(i, _)| i)
            .collect();
        self.matches = matches;
        self.selected = 0;
    }

    /// Visible items in document order
    pub fn visible(&self) -> impl Iterator<Item = &StructureItem> {
        self.matches.iter().filter_map(|&i| self.snapshot.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.matches.len()
    }

    /// Whether the snapshot row at `index` is shown
    pub fn is_visible(&self, index: usize) -> bool {
        self.matches.binary_search(&index).is_ok()
    }

    pub fn selected_item(&self) -> Option<&StructureItem> {
        self.matches
            .get(self.selected)
            .and_then(|&i| self.snapshot.get(i))
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.matches.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StructureModel {
        StructureModel::from_items(vec![
            StructureItem::global(0, "MAX_SIZE"),
            StructureItem::function(2, "parse").with_long_name("parse(text, size)"),
            StructureItem::class(6, "Parser"),
            StructureItem::method(7, "feed").with_long_name("feed(self, chunk)"),
        ])
        .unwrap()
    }

    fn names(overlay: &SearchOverlay) -> Vec<&str> {
        overlay.visible().map(|item| item.name()).collect()
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let overlay = SearchOverlay::open(snapshot());
        assert_eq!(overlay.visible_count(), 4);
    }

    #[test]
    fn test_case_insensitive_substring_on_long_name() {
        let mut overlay = SearchOverlay::open(snapshot());
        overlay.set_query("SIZE");
        // "parse" matches through its long name
        assert_eq!(names(&overlay), vec!["MAX_SIZE", "parse"]);
        assert!(overlay.is_visible(1));
        assert!(!overlay.is_visible(2));
    }

    #[test]
    fn test_live_typing_and_backspace() {
        let mut overlay = SearchOverlay::open(snapshot());
        for ch in "pars".chars() {
            overlay.insert_char(ch);
        }
        assert_eq!(names(&overlay), vec!["parse", "Parser"]);

        overlay.insert_char('e');
        overlay.insert_char('r');
        assert_eq!(names(&overlay), vec!["Parser"]);

        overlay.delete_backward();
        overlay.delete_backward();
        assert_eq!(names(&overlay), vec!["parse", "Parser"]);
    }

    #[test]
    fn test_selection_follows_matches() {
        let mut overlay = SearchOverlay::open(snapshot());
        overlay.set_query("f");
        assert_eq!(overlay.selected_item().map(|i| i.line()), Some(7));

        overlay.set_query("zzz");
        assert!(overlay.selected_item().is_none());
        overlay.select_next();
        assert!(overlay.selected_item().is_none());
    }

    #[test]
    fn test_matches_query_helper() {
        let item = StructureItem::function(0, "Render").with_long_name("Render(frame)");
        assert!(matches_query(&item, "FRAME"));
        assert!(matches_query(&item, ""));
        assert!(!matches_query(&item, "paint"));
    }
}
