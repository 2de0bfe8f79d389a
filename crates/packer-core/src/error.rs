//! Error types for the selection-to-pipeline flow.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackerError`.
pub type Result<T> = std::result::Result<T, PackerError>;

/// A required field of an archive request.
///
/// The declaration order is the order in which validation checks the
/// fields, so the first missing one is always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Encryption passphrase.
    Passphrase,
    /// Output file path.
    Destination,
    /// Directory whose children are offered for selection.
    Directory,
    /// Inventory and selection.
    Files,
}

impl Field {
    /// Returns the lowercase field name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passphrase => "passphrase",
            Self::Destination => "destination",
            Self::Directory => "directory",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while preparing or running a pack operation.
///
/// None of these variants ever carries the passphrase.
#[derive(Error, Debug)]
pub enum PackerError {
    /// The directory to scan could not be listed.
    #[error("cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The operator cancelled a prompt or the prompt surface failed.
    #[error("prompt aborted: {reason}")]
    PromptAborted {
        /// What happened to the prompt.
        reason: String,
    },

    /// A required request field is empty.
    #[error("missing {field}")]
    MissingField {
        /// First field found empty.
        field: Field,
    },

    /// A selected index does not exist in the inventory.
    #[error("selection index {index} out of range (inventory has {len} entries)")]
    SelectionOutOfRange {
        /// Offending zero-based index.
        index: usize,
        /// Number of inventory entries.
        len: usize,
    },

    /// An external pipeline stage did not succeed.
    #[error("pipeline failed at {stage}: {detail}")]
    PipelineFailed {
        /// Name of the stage held responsible.
        stage: String,
        /// Exit indication or launch failure.
        detail: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackerError {
    /// Shorthand for a cancelled or failed prompt.
    pub fn prompt_aborted(reason: impl Into<String>) -> Self {
        Self::PromptAborted {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the operator chose to cancel.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::PromptAborted { .. })
    }

    /// Returns the missing field, if this is a validation failure.
    #[must_use]
    pub const fn missing_field(&self) -> Option<Field> {
        match self {
            Self::MissingField { field } => Some(*field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_validation_order() {
        let mut fields = vec![
            Field::Files,
            Field::Directory,
            Field::Passphrase,
            Field::Destination,
        ];
        fields.sort();
        assert_eq!(
            fields,
            vec![
                Field::Passphrase,
                Field::Destination,
                Field::Directory,
                Field::Files
            ]
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = PackerError::MissingField {
            field: Field::Destination,
        };
        assert_eq!(err.to_string(), "missing destination");
        assert_eq!(err.missing_field(), Some(Field::Destination));
    }

    #[test]
    fn test_directory_unreadable_display() {
        let err = PackerError::DirectoryUnreadable {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_pipeline_failed_display() {
        let err = PackerError::PipelineFailed {
            stage: "gzip".into(),
            detail: "exit status: 1".into(),
        };
        assert_eq!(err.to_string(), "pipeline failed at gzip: exit status: 1");
    }

    #[test]
    fn test_prompt_aborted_is_cancellation() {
        assert!(PackerError::prompt_aborted("cancelled").is_cancellation());
        assert!(
            !PackerError::MissingField {
                field: Field::Files
            }
            .is_cancellation()
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PackerError = io_err.into();
        assert!(matches!(err, PackerError::Io(_)));
    }
}
