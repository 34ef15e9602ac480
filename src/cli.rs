//! Command-line argument parsing
//!
//! Supports:
//! - Printing the outline of a file, optionally filtered or as JSON
//! - Watching the file and reprinting on change
//! - Expanding the snippet at a 1-indexed LINE:COL

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::analyzers::content_type_for_path;
use crate::scan::Position;

/// Print the structural outline of a source file
#[derive(Parser, Debug)]
#[command(name = "source-outline", version, about = "Print the structural outline of a source file")]
pub struct CliArgs {
    /// File to analyse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Content type to use instead of guessing from the extension
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<String>,

    /// Only show items whose label contains this text (case-insensitive)
    #[arg(short, long, value_name = "QUERY")]
    pub filter: Option<String>,

    /// Print the outline as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep running and reprint the outline when the file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Quiet period after a change before re-analysing
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Expand the snippet at LINE:COL (1-indexed) and print the result
    #[arg(long, value_name = "LINE:COL", conflicts_with = "watch")]
    pub expand: Option<CursorArg>,

    /// Verbose logging on the console
    #[arg(short, long)]
    pub verbose: bool,
}

/// A `LINE:COL` argument, 1-indexed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorArg {
    pub line: usize,
    pub column: usize,
}

impl FromStr for CursorArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, column) = s
            .split_once(':')
            .ok_or_else(|| format!("expected LINE:COL, got '{}'", s))?;
        let parse = |part: &str, what: &str| {
            part.trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("{} must be a positive number, got '{}'", what, part))
        };
        Ok(Self {
            line: parse(line, "line")?,
            column: parse(column, "column")?,
        })
    }
}

impl CursorArg {
    /// Convert from 1-indexed (user input) to 0-indexed (internal)
    pub fn position(&self) -> Position {
        Position::new(self.line - 1, self.column - 1)
    }
}

impl CliArgs {
    /// The explicit content type, or one guessed from the file name
    pub fn resolved_content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| content_type_for_path(&self.file).to_string())
    }
}
