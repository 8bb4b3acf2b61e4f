//! Error types for photo API requests

use thiserror::Error;

/// Why a request to the photo API failed.
///
/// Callers never show these to the user directly: every variant collapses to
/// the message of the [`FetchFlow`] that was running.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No API key configured (set PHOTOFIND_API_KEY or run `photofind config --api-key`)")]
    MissingApiKey,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] attohttpc::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The user-facing flow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFlow {
    Search,
    Random,
}

impl FetchFlow {
    pub fn user_message(self) -> &'static str {
        match self {
            FetchFlow::Search => "Error fetching images. Try again later.",
            FetchFlow::Random => "Error fetching random image. Try again later.",
        }
    }
}

impl std::fmt::Display for FetchFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFlow::Search => write!(f, "search"),
            FetchFlow::Random => write!(f, "random"),
        }
    }
}
