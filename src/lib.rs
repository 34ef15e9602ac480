//! Source Outline - live structural outline of the document being edited
//!
//! The crate follows the Elm Architecture: messages go through
//! [`update::update`], which mutates the [`model::AnalysisService`] and
//! returns [`Cmd`]s for the [`runtime::Runtime`] to carry out. Analyzers run
//! on a background worker and their results come back as messages.

pub mod analysis;
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod events;
pub mod expand;
pub mod fs_watcher;
pub mod host;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod scan;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::OutlineConfig;
pub use host::EditorHost;
pub use messages::Msg;
pub use model::AnalysisService;
pub use runtime::Runtime;
