//! core/error.rs
//! Error types shared by the tag model, the custom metadata adapter and loading.

use std::fmt;

use thiserror::Error;

use super::family::ContainerFamily;

/// Which entry operation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    EditValue,
    RenameKey,
    RenameMeanKey,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::EditValue => "value edits",
            Operation::RenameKey => "key renames",
            Operation::RenameMeanKey => "mean-key renames",
            Operation::Delete => "deletion",
        })
    }
}

/// Failures of the custom metadata adapter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The file carries no tag of this family (and creation was not requested).
    #[error("no {0} tag present")]
    FamilyAbsent(ContainerFamily),

    /// The family has no custom metadata model (RIFF, XMP).
    #[error("{0} tags have no custom metadata model")]
    Unsupported(ContainerFamily),

    /// The entry does not expose this capability.
    #[error("entry does not allow {0}")]
    NotPermitted(Operation),

    /// The entry was removed or restructured since it was enumerated.
    #[error("entry `{0}` no longer exists")]
    Missing(String),

    /// The underlying store refused the key or value.
    #[error("rejected {what} `{value}`")]
    Rejected { what: &'static str, value: String },
}

impl AdapterError {
    pub(crate) fn rejected(what: &'static str, value: impl Into<String>) -> Self {
        AdapterError::Rejected {
            what,
            value: value.into(),
        }
    }
}

/// Failures while turning a byte buffer into a tag object or back.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file `{0}`")]
    Unsupported(String),

    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A name that did not match any variant of a closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl ParseNameError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        ParseNameError {
            kind,
            value: value.to_string(),
        }
    }
}
