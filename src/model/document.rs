//! Host document mirror
//!
//! The host editor owns the real documents; the tracker keeps a copy of
//! what analysis needs (content type, text, revision) for every open
//! document and remembers which one is active.

use std::collections::HashMap;

use ropey::Rope;

/// Opaque document identity assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// A text change reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Replace the whole buffer
    Replace(String),
    /// Insert text at a char index
    Insert { char_idx: usize, text: String },
    /// Remove a char range
    Delete { start: usize, end: usize },
}

/// Tracked state for one open document
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// Content type used to select an analyzer (e.g. "text/x-python")
    pub content_type: String,
    /// The text buffer
    pub buffer: Rope,
    /// Incremented on each edit
    pub revision: u64,
}

impl Document {
    pub fn new(id: DocumentId, content_type: impl Into<String>, text: &str) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            buffer: Rope::from_str(text),
            revision: 0,
        }
    }

    /// Apply an edit, clamping out-of-range indices to the buffer length
    pub fn apply(&mut self, edit: &TextEdit) {
        match edit {
            TextEdit::Replace(text) => {
                self.buffer = Rope::from_str(text);
            }
            TextEdit::Insert { char_idx, text } => {
                let at = (*char_idx).min(self.buffer.len_chars());
                self.buffer.insert(at, text);
            }
            TextEdit::Delete { start, end } => {
                let len = self.buffer.len_chars();
                let (start, end) = ((*start).min(len), (*end).min(len));
                if start < end {
                    self.buffer.remove(start..end);
                }
            }
        }
        self.revision += 1;
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }
}

/// Tracks open documents and the active one
#[derive(Debug, Default)]
pub struct DocumentTracker {
    documents: HashMap<DocumentId, Document>,
    active: Option<DocumentId>,
}

impl DocumentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a document. Re-opening an id replaces its state.
    pub fn open(&mut self, id: DocumentId, content_type: impl Into<String>, text: &str) {
        if self.documents.contains_key(&id) {
            tracing::debug!("Document {} reopened, replacing tracked state", id.0);
        }
        self.documents.insert(id, Document::new(id, content_type, text));
    }

    /// Stop tracking a document. Returns true if it was the active one.
    pub fn close(&mut self, id: DocumentId) -> bool {
        self.documents.remove(&id);
        if self.active == Some(id) {
            self.active = None;
            return true;
        }
        false
    }

    /// Make a document active. Returns false for unknown documents.
    pub fn activate(&mut self, id: DocumentId) -> bool {
        if !self.documents.contains_key(&id) {
            tracing::warn!("Activation of untracked document {}", id.0);
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Apply an edit. Returns the new revision, or None for unknown documents.
    pub fn edit(&mut self, id: DocumentId, edit: &TextEdit) -> Option<u64> {
        let doc = self.documents.get_mut(&id)?;
        doc.apply(edit);
        Some(doc.revision)
    }

    /// Change a document's content type. Returns false if unchanged or unknown.
    pub fn set_content_type(&mut self, id: DocumentId, content_type: &str) -> bool {
        match self.documents.get_mut(&id) {
            Some(doc) if doc.content_type != content_type => {
                doc.content_type = content_type.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|id| self.documents.get(&id))
    }

    pub fn is_active(&self, id: DocumentId) -> bool {
        self.active == Some(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_bump_revision() {
        let mut tracker = DocumentTracker::new();
        let id = DocumentId(1);
        tracker.open(id, "text/x-python", "x = 1\n");

        assert_eq!(
            tracker.edit(
                id,
                &TextEdit::Insert {
                    char_idx: 0,
                    text: "y = 2\n".into()
                }
            ),
            Some(1)
        );
        assert_eq!(tracker.get(id).unwrap().text(), "y = 2\nx = 1\n");

        assert_eq!(tracker.edit(id, &TextEdit::Delete { start: 0, end: 6 }), Some(2));
        assert_eq!(tracker.get(id).unwrap().text(), "x = 1\n");

        assert_eq!(tracker.edit(DocumentId(9), &TextEdit::Replace("".into())), None);
    }

    #[test]
    fn test_out_of_range_edit_is_clamped() {
        let mut doc = Document::new(DocumentId(1), "text/plain", "abc");
        doc.apply(&TextEdit::Insert {
            char_idx: 100,
            text: "d".into(),
        });
        doc.apply(&TextEdit::Delete { start: 2, end: 100 });
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.revision, 2);
    }

    #[test]
    fn test_activation_and_close() {
        let mut tracker = DocumentTracker::new();
        tracker.open(DocumentId(1), "text/plain", "");
        tracker.open(DocumentId(2), "text/plain", "");

        assert!(!tracker.activate(DocumentId(3)));
        assert_eq!(tracker.active_id(), None);

        assert!(tracker.activate(DocumentId(2)));
        assert!(tracker.is_active(DocumentId(2)));

        assert!(!tracker.close(DocumentId(1)));
        assert!(tracker.close(DocumentId(2)));
        assert_eq!(tracker.active_id(), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_content_type_change() {
        let mut tracker = DocumentTracker::new();
        tracker.open(DocumentId(1), "text/plain", "");
        assert!(tracker.set_content_type(DocumentId(1), "text/x-python"));
        assert!(!tracker.set_content_type(DocumentId(1), "text/x-python"));
        assert_eq!(tracker.get(DocumentId(1)).unwrap().content_type, "text/x-python");
    }
}
