// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the merge screen.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the host presents the message.

use crate::error::FusionError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again may work without changing anything.
    Transient,
    /// The user must change the file list before merging again.
    ActionRequired,
    /// A file can never be merged as-is.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same merge could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `FusionError` into a `HumanError`.
pub fn humanize_error(err: &FusionError) -> HumanError {
    match err {
        FusionError::EmptyInputSet => HumanError {
            message: "Please add at least one file to merge.".into(),
            suggestion: "Drop PDF, PNG, or JPG files onto the list, or choose them with the file picker.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FusionError::MergeInProgress => HumanError {
            message: "A merge is already running.".into(),
            suggestion: "Wait for the current merge to finish.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FusionError::SourceReadFailure { id, .. } => HumanError {
            message: "One of the files couldn't be read.".into(),
            suggestion: format!(
                "It may have been moved or deleted. Remove it from the list and add it again. (File: {id})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FusionError::UnsupportedMediaKind { kind, .. } => HumanError {
            message: "This type of file can't be merged.".into(),
            suggestion: format!(
                "Only PDF, PNG, and JPG files are supported. Remove the file and try again. (File type: {kind})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        FusionError::DecodeFailure { id, .. } => HumanError {
            message: "One of the files appears to be damaged.".into(),
            suggestion: format!(
                "Try opening it in another program to check it works, or remove it from the list. (File: {id})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        FusionError::InvalidMove { .. } => HumanError {
            message: "That file couldn't be moved there.".into(),
            suggestion: "The list changed while you were dragging. Try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FusionError::PdfError(_) => HumanError {
            message: "Building the merged PDF failed.".into(),
            suggestion: "Try merging again. If it keeps failing, merge the files in smaller groups to find the problem file.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FusionError::ImageError(_) => HumanError {
            message: "There's a problem with one of the images.".into(),
            suggestion: "Try saving it as a JPEG or PNG again, then add it back.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FusionError::Output(_) => HumanError {
            message: "The merged PDF couldn't be saved.".into(),
            suggestion: "Check there is free space and that the download folder is writable, then merge again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FusionError::Config(detail) => HumanError {
            message: "The merge settings are invalid.".into(),
            suggestion: format!("Reset the settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FusionError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        FusionError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
