//! Snapshot handlers: report files and console output

pub mod composite;
pub mod console;
pub mod json_file;

// Re-export for convenience
pub use composite::CompositeHandler;
pub use console::ConsoleHandler;
pub use json_file::JsonFileHandler;
