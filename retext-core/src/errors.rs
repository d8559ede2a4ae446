//! errors.rs - Custom error types for the retext-core library.
//!
//! `CompileError` describes why a single rule was dropped during compilation.
//! `RetextError` covers everything else the library can report. Substitution
//! itself never fails: it degrades to returning its input unchanged.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Reasons a single rule definition could not be turned into a matcher.
///
/// A `CompileError` is never fatal to a batch: the offending rule is skipped
/// and the remaining rules still compile and apply.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum CompileError {
    #[error("Rule #{0}: `find` is empty after trimming")]
    EmptyFind(usize),

    #[error("Rule #{0}: pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(usize, usize, usize),

    #[error("Rule #{index} ('{find}'): invalid pattern: {source}")]
    InvalidPattern {
        index: usize,
        find: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule #{0}: unsupported flag '{1}'")]
    UnsupportedFlag(usize, char),

    #[error("Rule #{0}: flag '{1}' given more than once")]
    DuplicateFlag(usize, char),
}

impl CompileError {
    /// Position of the offending rule in its source list.
    pub fn rule_index(&self) -> usize {
        match self {
            CompileError::EmptyFind(i)
            | CompileError::PatternLengthExceeded(i, _, _)
            | CompileError::UnsupportedFlag(i, _)
            | CompileError::DuplicateFlag(i, _) => *i,
            CompileError::InvalidPattern { index, .. } => *index,
        }
    }
}

/// This enum represents all possible error types in the `retext-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RetextError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Invalid context '{0}': expected 'frontend' or 'admin'")]
    InvalidContext(String),

    #[error("Unknown extension point '{0}'")]
    UnknownExtensionPoint(String),

    #[error("Node {0} does not exist in the document")]
    MissingNode(String),

    #[error("Cannot move node {0} beneath its own descendant")]
    CyclicMove(String),

    #[error("Failed to (de)serialize client payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}
