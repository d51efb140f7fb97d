// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// These are what the failure callbacks of the boolean API receive.

use std::fmt;

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it (wrong path, missing folder, bad parameter).
    ActionRequired,
    /// Retrying with the same inputs will fail again.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl fmt::Display for HumanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BildwerkError` into a `HumanError`.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::InputNotFound(path) => HumanError {
            message: format!("The image {} couldn't be found.", path.display()),
            suggestion: "Check the file name and folder, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::OutputDirNotFound(path) => HumanError {
            message: format!("The folder {} doesn't exist.", path.display()),
            suggestion: "Create the folder first, or choose a different one.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::UnsupportedFormat(format) => HumanError {
            message: format!("Images can't be saved as {format}."),
            suggestion: "Choose one of jpeg, png, gif, bmp, tiff, webp or ico.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidPercentage(value) => HumanError {
            message: format!("{value} is not a valid quality."),
            suggestion: "Use a number between 0 and 100.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidParameter { name, reason } => HumanError {
            message: format!("The {name} isn't valid."),
            suggestion: format!("Adjust it and try again. ({reason})"),
            severity: Severity::ActionRequired,
        },

        BildwerkError::Decode(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        BildwerkError::Encode(detail) => HumanError {
            message: "The result couldn't be saved in that format.".into(),
            suggestion: format!("Try a different output format. ({detail})"),
            severity: Severity::Permanent,
        },

        BildwerkError::NothingToMerge => HumanError {
            message: "None of the images to merge could be found.".into(),
            suggestion: "Check the list of image paths.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::Font(_) => HumanError {
            message: "The font couldn't be loaded.".into(),
            suggestion: "Point the text options at a TrueType (.ttf) or OpenType (.otf) font file.".into(),
            severity: Severity::ActionRequired,
        },

        BildwerkError::Metadata(_) => HumanError {
            message: "The photo details couldn't be read.".into(),
            suggestion: "The embedded metadata may be damaged.".into(),
            severity: Severity::Permanent,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Bildwerk doesn't have permission to use that file.".into(),
                    suggestion: "Check the file and folder permissions.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "A file couldn't be read or written.".into(),
                    suggestion: format!("Check there is enough disk space. ({io_err})"),
                    severity: Severity::Permanent,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Fix or delete the settings file to go back to defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_input_is_action_required() {
        let human = humanize_error(&BildwerkError::InputNotFound(PathBuf::from("cat.jpg")));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("cat.jpg"));
    }

    #[test]
    fn broken_image_is_permanent() {
        let human = humanize_error(&BildwerkError::Decode("truncated".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn permission_denied_is_action_required() {
        let err = BildwerkError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn display_joins_message_and_suggestion() {
        let human = humanize_error(&BildwerkError::InvalidPercentage(140));
        assert_eq!(human.to_string(), "140 is not a valid quality. Use a number between 0 and 100.");
    }
}
