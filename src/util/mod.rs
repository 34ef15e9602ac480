//! Utility modules

pub mod file_validation;
pub mod text;

pub use text::{is_word_boundary, leading_whitespace, line_chars, word_bounds, WORD_BOUNDARY};

// Re-export file validation utilities
pub use file_validation::{
    filename_for_display, is_likely_binary, read_source, validate_file_for_opening, FileOpenError,
    MAX_FILE_SIZE,
};
