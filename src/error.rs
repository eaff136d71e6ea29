//! Error types shared across the lesson runtime.
//!
//! None of these are fatal: the browser glue logs them and degrades to an inert
//! but visible UI state.

use thiserror::Error;

/// The lesson document could not be decoded.
#[derive(Error, Debug)]
pub enum LessonError {
    #[error("lesson document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetching the lesson document failed on every configured URL.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error("content container #{0} not found")]
    MissingContainer(String),
}

/// Persisted key-value storage was unavailable or held garbage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write rejected: {0}")]
    Write(String),
    #[error("score map could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A clip could not be started by the audio backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("no audio file specified")]
    EmptyPath,
    #[error("could not start {path}: {reason}")]
    Start { path: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);
