//! Built-in analyzers and content type detection

pub mod python;

use std::path::Path;

use crate::analysis::AnalyzerRegistry;

pub use python::PythonAnalyzer;

/// Content type used when nothing else matches
pub const PLAIN_TEXT: &str = "text/plain";

/// Detect a content type from a file extension
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "py" | "pyw" | "pyi" => python::CONTENT_TYPE,
        "c" | "h" => "text/x-csrc",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "text/x-c++src",
        "rs" => "text/rust",
        "js" | "mjs" | "cjs" => "application/javascript",
        "md" | "markdown" => "text/markdown",
        "yaml" | "yml" => "application/x-yaml",
        "sh" | "bash" => "application/x-shellscript",
        _ => PLAIN_TEXT,
    }
}

/// Detect a content type from a file path
pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(content_type_for_extension)
        .unwrap_or(PLAIN_TEXT)
}

/// Registry with every built-in analyzer
pub fn builtin_registry() -> AnalyzerRegistry {
    let mut registry = AnalyzerRegistry::new();
    registry.register_all(
        &[python::CONTENT_TYPE, "text/x-script.python"],
        PythonAnalyzer::new(),
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path(Path::new("a/b/tool.py")), "text/x-python");
        assert_eq!(content_type_for_path(Path::new("MAIN.PY")), "text/x-python");
        assert_eq!(content_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(content_type_for_path(Path::new("Makefile")), "text/plain");
    }

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry();
        assert!(registry.supports("text/x-python"));
        assert!(registry.supports("text/x-script.python"));
        assert!(!registry.supports("text/plain"));
    }
}
