//! Source file checks
//!
//! Files handed to the CLI are validated before being read: existence,
//! size, and a null-byte sniff for binaries.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Largest file the CLI will analyse (16 MB)
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Why a file cannot be analysed
#[derive(Debug, Clone, PartialEq)]
pub enum FileOpenError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// Contains null bytes in its first block
    BinaryFile,
    /// Not valid UTF-8
    NotUtf8,
    TooLarge { size_mb: f64 },
    IoError(String),
}

impl FileOpenError {
    /// Message for the terminal, naming the file
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot analyse a directory: {}", filename),
            Self::BinaryFile => format!("Cannot analyse binary file: {}", filename),
            Self::NotUtf8 => format!("{} is not valid UTF-8", filename),
            Self::TooLarge { size_mb } => {
                format!(
                    "{} is too large ({:.1} MB, max {} MB)",
                    filename,
                    size_mb,
                    MAX_FILE_SIZE / (1024 * 1024)
                )
            }
            Self::IoError(msg) => format!("Error reading {}: {}", filename, msg),
        }
    }
}

impl std::fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::BinaryFile => write!(f, "binary file"),
            Self::NotUtf8 => write!(f, "invalid UTF-8"),
            Self::TooLarge { size_mb } => write!(f, "file too large ({:.1} MB)", size_mb),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

fn io_error(e: std::io::Error) -> FileOpenError {
    match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound,
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied,
        _ => FileOpenError::IoError(e.to_string()),
    }
}

/// Check existence, type and size. Does not look at the content.
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(io_error)?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Null bytes in the first 8KB mean binary.
///
/// Read errors return `false`; the actual read reports them.
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; 8192];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// Validate and read a source file as text
pub fn read_source(path: &Path) -> Result<String, FileOpenError> {
    validate_file_for_opening(path)?;
    if is_likely_binary(path) {
        return Err(FileOpenError::BinaryFile);
    }
    let bytes = fs::read(path).map_err(io_error)?;
    String::from_utf8(bytes).map_err(|_| FileOpenError::NotUtf8)
}

/// File name for messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
