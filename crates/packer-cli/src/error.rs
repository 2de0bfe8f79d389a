//! Error conversion utilities for CLI.
//!
//! Converts packer-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance, and maps them to
//! process exit codes.

use packer_core::Field;
use packer_core::PackerError;
use std::process::ExitCode;

/// Fatal error without a more specific code
pub const FAILURE: u8 = 1;
/// A required value was empty
pub const MISSING_FIELD: u8 = 2;
/// The source directory could not be listed
pub const DIRECTORY_UNREADABLE: u8 = 3;
/// An external stage failed
pub const PIPELINE_FAILED: u8 = 4;
/// Prompt cancelled or no terminal (128 + SIGINT)
pub const PROMPT_ABORTED: u8 = 130;

/// Converts `PackerError` to a user-friendly anyhow error.
///
/// The original error stays reachable through the error chain so
/// [`exit_code`] can classify it.
pub fn convert_packer_error(err: PackerError) -> anyhow::Error {
    let message = match &err {
        PackerError::DirectoryUnreadable { path, .. } => format!(
            "Cannot read directory '{}'\n\
             HINT: Check that the path exists, is a directory, and is readable.",
            path.display()
        ),
        PackerError::PromptAborted { .. } => "Aborted before anything was written\n\
             HINT: Without a terminal, pass --pass, --out and --select \
             (or set PACKER_PASS and PACKER_OUT)."
            .to_string(),
        PackerError::MissingField { field } => missing_field_message(*field),
        PackerError::SelectionOutOfRange { index, len } => format!(
            "Entry number {} does not exist ({len} entries offered)\n\
             HINT: Run with --list to see entry numbers.",
            index + 1
        ),
        PackerError::PipelineFailed { stage, .. } => format!(
            "Packing failed at {stage}\n\
             HINT: The output file may be incomplete. Check that the tools are installed, \
             or use --no-progress if pv is missing."
        ),
        _ => "Packing failed".to_string(),
    };
    anyhow::Error::new(err).context(message)
}

fn missing_field_message(field: Field) -> String {
    match field {
        Field::Passphrase => "No passphrase given\n\
             HINT: Use --pass or set PACKER_PASS."
            .to_string(),
        Field::Destination => "No output file given\n\
             HINT: Use --out, the OUTPUT argument, or set PACKER_OUT."
            .to_string(),
        Field::Directory => "No directory given\n\
             HINT: Pass DIRECTORY or --dir."
            .to_string(),
        Field::Files => "Nothing to pack\n\
             HINT: Select at least one entry. Dot-prefixed entries need --include-hidden."
            .to_string(),
    }
}

/// Adds CLI context to a core result.
pub fn add_packer_context<T>(result: packer_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_packer_error)
}

/// Exit status for an error returned from a command.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<PackerError>())
        .map_or(FAILURE, |e| match e {
            PackerError::MissingField { .. } => MISSING_FIELD,
            PackerError::DirectoryUnreadable { .. } => DIRECTORY_UNREADABLE,
            PackerError::PipelineFailed { .. } => PIPELINE_FAILED,
            PackerError::PromptAborted { .. } => PROMPT_ABORTED,
            _ => FAILURE,
        })
}
