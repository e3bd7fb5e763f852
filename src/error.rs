use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotesError>;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("error: {0}")]
    AnyError(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("No {0} folder configured")]
    MissingPath(&'static str),

    #[error("Request could not be cloned for retry")]
    RequestNotCloneable,
}
