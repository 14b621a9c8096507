use thiserror::Error;

/// Result alias used across the dashboard client.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories surfaced to the user interface.
///
/// Every fallible operation in the client resolves to one of these kinds so
/// the presentation layer can render a single error banner without inspecting
/// the originating call site. `Clone` and `PartialEq` let errors travel
/// through component messages and be asserted on directly in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad or missing local input (empty template, non-positive rate,
    /// references to fields the data source does not provide).
    #[error("invalid input: {0}")]
    Validation(String),

    /// Malformed tabular payload (empty file, empty header row).
    #[error("could not parse data source: {0}")]
    Parse(String),

    /// A linked remote source could not be fetched or connected.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The requested action clashes with work already in flight.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Network or backend failure on an HTTP or websocket call.
    #[error("transport error: {0}")]
    Transport(String),
}
