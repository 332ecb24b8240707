//! Error taxonomy shared by the analysis core.
//!
//! Invalid per-comment input (missing or non-string text) is not an error:
//! it is absorbed as a neutral / empty contribution at the call site.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The tokenizer could not segment text. Fatal for the enclosing call.
    #[error("tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),

    /// Raised only by the orchestrator; core operations return empty results.
    #[error("corpus contains no comments")]
    EmptyCorpus,

    /// Malformed or unreadable lexicon / stopword / dictionary file.
    #[error("configuration error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    pub(crate) fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
