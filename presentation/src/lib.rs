//! Presentation layer for llm-deliberate
//!
//! CLI argument definitions, console output formatting, and progress bars.

pub mod cli;
pub mod output;
pub mod progress;

pub use cli::{Cli, Command, ExportFormat};
pub use output::ConsoleFormatter;
pub use progress::{ProgressReporter, SimpleProgress};
