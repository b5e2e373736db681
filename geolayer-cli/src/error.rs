//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Relay(#[from] geolayer::relay::RelayError),

    #[error(transparent)]
    Source(#[from] geolayer::source::SourceError),
}
