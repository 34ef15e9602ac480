//! Snippet expansion
//!
//! Typing a name (optionally followed by a parenthesised argument) and
//! triggering expansion replaces it with generated text. Expansions are
//! grouped per content type and loaded from YAML files:
//!
//! ```yaml
//! # ~/.config/source-outline/expand/text_x-python.yaml
//! main: |
//!   def main():
//!       ${cursor}
//! log: "print${arg}"
//! ```
//!
//! `${arg}` is the argument with its parentheses, so `log(x, 1)` becomes
//! `print(x, 1)`.
//!
//! `all.yaml` applies to every content type; the content-type file wins on
//! name clashes.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ropey::Rope;

use crate::scan::{word_and_argument_at, Position, ScanError, TextRange};
use crate::util::text::{leading_whitespace, line_chars};

/// Marks the cursor position in generated text
pub const CURSOR_MARKER: char = '\u{1}';

const ARG_PLACEHOLDER: &str = "${arg}";
const CURSOR_PLACEHOLDER: &str = "${cursor}";

/// Name of the expansion set shared by all content types
pub const SHARED_SET: &str = "all";

/// Produces replacement text for a word and its optional argument
pub trait Expansion: Send + Sync {
    fn expand(&self, argument: Option<&str>) -> Result<String, String>;
}

impl<F> Expansion for F
where
    F: Fn(Option<&str>) -> Result<String, String> + Send + Sync,
{
    fn expand(&self, argument: Option<&str>) -> Result<String, String> {
        self(argument)
    }
}

/// Text with `${arg}` and `${cursor}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: String,
}

impl Template {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl Expansion for Template {
    fn expand(&self, argument: Option<&str>) -> Result<String, String> {
        if self.body.contains(ARG_PLACEHOLDER) && argument.is_none() {
            return Err("expansion needs an argument".to_string());
        }
        Ok(self
            .body
            .replace(ARG_PLACEHOLDER, argument.unwrap_or_default())
            .replacen(CURSOR_PLACEHOLDER, &CURSOR_MARKER.to_string(), 1)
            .replace(CURSOR_PLACEHOLDER, ""))
    }
}

/// Why an expansion could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// The argument delimiters could not be matched
    Scan(ScanError),
    /// No word at the cursor
    NoWord,
    /// No expansion with this name
    NotFound(String),
    /// The expansion itself failed
    Failed { name: String, reason: String },
    /// An expansion file could not be read
    Load { path: PathBuf, message: String },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::Scan(e) => write!(f, "Cannot expand: {}", e),
            ExpandError::NoWord => write!(f, "Nothing to expand at the cursor"),
            ExpandError::NotFound(name) => write!(f, "No expansion named '{}'", name),
            ExpandError::Failed { name, reason } => {
                write!(f, "Expansion '{}' failed: {}", name, reason)
            }
            ExpandError::Load { path, message } => {
                write!(f, "Cannot load {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ExpandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpandError::Scan(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScanError> for ExpandError {
    fn from(e: ScanError) -> Self {
        ExpandError::Scan(e)
    }
}

/// Named expansions for one content type
#[derive(Clone, Default)]
pub struct ExpansionSet {
    expansions: HashMap<String, Arc<dyn Expansion>>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, expansion: impl Expansion + 'static) {
        self.expansions.insert(name.into(), Arc::new(expansion));
    }

    /// Insert a closure. Spelled out so closure arguments infer.
    pub fn insert_fn<F>(&mut self, name: impl Into<String>, expansion: F)
    where
        F: Fn(Option<&str>) -> Result<String, String> + Send + Sync + 'static,
    {
        self.insert(name, expansion);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Expansion>> {
        self.expansions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.expansions.contains_key(name)
    }

    /// Add all of `other`, replacing same-named entries
    pub fn merge(&mut self, other: &ExpansionSet) {
        for (name, expansion) in &other.expansions {
            self.expansions.insert(name.clone(), Arc::clone(expansion));
        }
    }

    /// Sorted names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.expansions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    /// Parse a `name: template` YAML mapping
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let templates: HashMap<String, String> = serde_yaml::from_str(content)?;
        let mut set = Self::new();
        for (name, body) in templates {
            set.insert(name, Template::new(body));
        }
        Ok(set)
    }

    pub fn load_file(path: &Path) -> Result<Self, ExpandError> {
        let load_error = |message: String| ExpandError::Load {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        Self::from_yaml(&content).map_err(|e| load_error(e.to_string()))
    }
}

impl fmt::Debug for ExpansionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpansionSet")
            .field("names", &self.names())
            .finish()
    }
}

/// File stem for a content type: `text/x-python` → `text_x-python`
pub fn set_name_for(content_type: &str) -> String {
    content_type.replace('/', "_")
}

/// Resolves and caches expansion sets per content type
#[derive(Debug, Default)]
pub struct ExpansionLoader {
    dirs: Vec<PathBuf>,
    /// Sets registered in code, keyed by set name
    builtin: HashMap<String, ExpansionSet>,
    cache: HashMap<String, ExpansionSet>,
}

impl ExpansionLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            ..Default::default()
        }
    }

    /// Register an expansion in code. `content_type` may be [`SHARED_SET`].
    pub fn register(
        &mut self,
        content_type: &str,
        name: impl Into<String>,
        expansion: impl Expansion + 'static,
    ) {
        self.builtin
            .entry(set_name_for(content_type))
            .or_default()
            .insert(name, expansion);
        self.cache.clear();
    }

    /// Forget cached sets so files are read again
    pub fn reload(&mut self) {
        self.cache.clear();
    }

    /// The merged set for a content type
    pub fn for_content_type(&mut self, content_type: &str) -> &ExpansionSet {
        let key = set_name_for(content_type);
        if !self.cache.contains_key(&key) {
            let set = self.build(&key);
            tracing::debug!("Loaded {} expansions for {}", set.len(), content_type);
            self.cache.insert(key.clone(), set);
        }
        &self.cache[&key]
    }

    fn build(&self, key: &str) -> ExpansionSet {
        let mut set = ExpansionSet::new();
        for name in [SHARED_SET, key] {
            if let Some(builtin) = self.builtin.get(name) {
                set.merge(builtin);
            }
            for dir in &self.dirs {
                let path = dir.join(format!("{}.yaml", name));
                if !path.exists() {
                    continue;
                }
                match ExpansionSet::load_file(&path) {
                    Ok(loaded) => set.merge(&loaded),
                    Err(e) => tracing::warn!("{}", e),
                }
            }
        }
        set
    }
}

/// A planned replacement in the active document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionEdit {
    /// Word plus argument, removed as one
    pub range: TextRange,
    /// Inserted at `range.start`, markers removed
    pub text: String,
    /// Cursor after the edit, if the expansion placed one
    pub cursor: Option<Position>,
}

impl ExpansionEdit {
    pub fn apply(&self, rope: &mut Rope) {
        let range = self.range.char_range(rope);
        let start = range.start;
        if !range.is_empty() {
            rope.remove(range);
        }
        rope.insert(start, &self.text);
    }
}

/// Position reached after inserting `text` at `start`
fn position_after(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(last) => Position::new(
            start.line + text.matches('\n').count(),
            text[last + 1..].chars().count(),
        ),
        None => Position::new(start.line, start.column + text.chars().count()),
    }
}

/// Work out the edit for expanding the word at `cursor`
///
/// Nothing is changed here; an error means the document must be left alone.
pub fn plan_expansion(
    rope: &Rope,
    cursor: Position,
    set: &ExpansionSet,
) -> Result<ExpansionEdit, ExpandError> {
    let found = word_and_argument_at(rope, cursor)?;
    if found.word.is_empty() {
        return Err(ExpandError::NoWord);
    }

    let name = found.word_text(rope);
    let expansion = set
        .get(&name)
        .ok_or_else(|| ExpandError::NotFound(name.clone()))?;
    let argument = found.argument_text(rope);
    let generated = expansion
        .expand(argument.as_deref())
        .map_err(|reason| ExpandError::Failed {
            name: name.clone(),
            reason,
        })?;

    let indent = leading_whitespace(&line_chars(rope, found.word.start.line));
    let indented = generated.replace('\n', &format!("\n{}", indent));

    let range = found.full_range();
    let (text, cursor) = match indented.find(CURSOR_MARKER) {
        Some(at) => {
            let cursor = position_after(range.start, &indented[..at]);
            (indented.replace(CURSOR_MARKER, ""), Some(cursor))
        }
        None => (indented, None),
    };

    tracing::debug!(
        "Expanding '{}' at {}:{} ({} chars)",
        name,
        range.start.line,
        range.start.column,
        text.chars().count()
    );

    Ok(ExpansionEdit {
        range,
        text,
        cursor,
    })
}
