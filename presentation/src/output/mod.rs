//! Console output formatting

mod formatter;

pub use formatter::ConsoleFormatter;
