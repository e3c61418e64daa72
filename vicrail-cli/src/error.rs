//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use vicrail::fetcher::FetchError;
use vicrail::source::SourceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Failed to create the HTTP client
    HttpClient(SourceError),
    /// Failed to load the feature collections
    Load(FetchError),
    /// Failed to write the export file
    Export { path: String, message: String },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Load(_) = self {
            eprintln!();
            eprintln!("The Vicmap Transport service may be slow or temporarily unavailable.");
            eprintln!("Nothing was cached from the failed attempt; re-running is safe.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Load(e) => write!(f, "Failed to load feature data: {}", e),
            CliError::Export { path, message } => {
                write!(f, "Failed to export to {}: {}", path, message)
            }
        }
    }
}
