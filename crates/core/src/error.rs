use thiserror::Error;

use crate::map::LibraryModule;

/// The dataset as a whole could not be used.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is not a JSON array (found {found})")]
    NotAnArray { found: &'static str },

    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single country row was rejected during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("row is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("duplicate country id `{0}`")]
    DuplicateId(String),

    #[error("field `{field}` has unexpected shape: expected {expected}")]
    UnexpectedShape {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("failed to load map module {module}: {reason}")]
    Load {
        module: LibraryModule,
        reason: String,
    },

    #[error("mount point `{mount}` is already owned by chart #{owner}")]
    MountBusy { mount: String, owner: u64 },

    #[error("map widget has been disposed")]
    Disposed,
}

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid timeline data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    #[error("name is required")]
    MissingName,

    #[error("email address is invalid")]
    InvalidEmail,
}
