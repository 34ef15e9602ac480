//! Structural outline items
//!
//! An analyzer turns source text into an ordered list of [`StructureItem`]s.
//! The list is frozen into a [`StructureModel`] snapshot, which is what the
//! browser and the search overlay read from.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Symbol kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    GlobalVariable,
    Function,
    Class,
    Method,
    Property,
}

/// Row styling for an item kind: a two-stop vertical gradient plus a
/// separator rule at the bottom of the row, and the label indent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStyle {
    pub top: u32,
    pub bottom: u32,
    pub rule: u8,
    pub indent: usize,
}

impl ItemKind {
    /// Short label for rendering next to the entry
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::GlobalVariable => "var",
            ItemKind::Function => "fn",
            ItemKind::Class => "class",
            ItemKind::Method => "fn",
            ItemKind::Property => "prop",
        }
    }

    /// Members are shown nested under their class
    pub fn is_member(&self) -> bool {
        matches!(self, ItemKind::Method | ItemKind::Property)
    }

    /// Display style for this kind. Members get `member_indent` columns.
    pub fn style(&self, member_indent: usize) -> ItemStyle {
        let indent = if self.is_member() { member_indent } else { 0 };
        let (top, bottom, rule) = match self {
            ItemKind::GlobalVariable => (0xFFED_E0B2, 0xFFF3_EACD, 210),
            ItemKind::Function => (0xFFDB_EDAA, 0xFFE7_F3C7, 210),
            ItemKind::Class => (0xFFC4_DBF1, 0xFFC8_DFF6, 190),
            ItemKind::Method | ItemKind::Property => (0xFFD3_EBF9, 0xFFE3_F0F7, 210),
        };
        ItemStyle {
            top,
            bottom,
            rule,
            indent,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::GlobalVariable => "global variable",
            ItemKind::Function => "function",
            ItemKind::Class => "class",
            ItemKind::Method => "method",
            ItemKind::Property => "property",
        };
        f.write_str(name)
    }
}

/// Accessor methods backing a property, as indices into the same model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropertyAccessors {
    pub getter: Option<usize>,
    pub setter: Option<usize>,
    pub deleter: Option<usize>,
}

impl PropertyAccessors {
    fn indices(&self) -> impl Iterator<Item = usize> {
        [self.getter, self.setter, self.deleter].into_iter().flatten()
    }
}

/// A single entry in the outline, anchored to a 0-indexed source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureItem {
    kind: ItemKind,
    line: usize,
    name: String,
    long_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    accessors: Option<PropertyAccessors>,
}

impl StructureItem {
    pub fn new(kind: ItemKind, line: usize, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self {
            kind,
            line,
            long_name: name.clone(),
            name,
            accessors: None,
        }
    }

    pub fn global(line: usize, name: impl Into<String>) -> Self {
        Self::new(ItemKind::GlobalVariable, line, name)
    }

    pub fn function(line: usize, name: impl Into<String>) -> Self {
        Self::new(ItemKind::Function, line, name)
    }

    pub fn class(line: usize, name: impl Into<String>) -> Self {
        Self::new(ItemKind::Class, line, name)
    }

    pub fn method(line: usize, name: impl Into<String>) -> Self {
        Self::new(ItemKind::Method, line, name)
    }

    pub fn property(line: usize, name: impl Into<String>, accessors: PropertyAccessors) -> Self {
        let mut item = Self::new(ItemKind::Property, line, name);
        item.accessors = Some(accessors);
        item
    }

    /// Set the long name (e.g. with parameters) used for display and search
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into().trim().to_string();
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Only properties carry accessors
    pub fn accessors(&self) -> Option<&PropertyAccessors> {
        self.accessors.as_ref()
    }
}

/// Why a list of items cannot become a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedStructure {
    /// An accessor index points outside the item list
    AccessorOutOfRange { item: usize, index: usize },
    /// Accessors were attached to something other than a property
    AccessorsOnNonProperty { item: usize },
}

impl fmt::Display for MalformedStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessorOutOfRange { item, index } => {
                write!(f, "item {} refers to missing accessor {}", item, index)
            }
            Self::AccessorsOnNonProperty { item } => {
                write!(f, "item {} has accessors but is not a property", item)
            }
        }
    }
}

impl std::error::Error for MalformedStructure {}

/// Immutable, ordered outline snapshot (document order)
///
/// Cloning is cheap; the browser and the search overlay each hold their own
/// handle, so replacing the current model never exposes a partial list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureModel {
    items: Arc<[StructureItem]>,
}

impl StructureModel {
    /// Freeze analyzer output into a model, rejecting dangling accessors
    pub fn from_items(items: Vec<StructureItem>) -> Result<Self, MalformedStructure> {
        for (i, item) in items.iter().enumerate() {
            let Some(accessors) = item.accessors() else {
                continue;
            };
            if item.kind != ItemKind::Property {
                return Err(MalformedStructure::AccessorsOnNonProperty { item: i });
            }
            if let Some(index) = accessors.indices().find(|&index| index >= items.len()) {
                return Err(MalformedStructure::AccessorOutOfRange { item: i, index });
            }
        }

        Ok(Self {
            items: items.into(),
        })
    }

    pub fn items(&self) -> &[StructureItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&StructureItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve one of a property's accessor indices
    pub fn accessor(&self, index: Option<usize>) -> Option<&StructureItem> {
        index.and_then(|i| self.items.get(i))
    }
}
