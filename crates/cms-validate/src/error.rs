use std::fmt;

use cms_types::ContentType;
use thiserror::Error;

/// A single problem with a submitted field set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A required attribute was not supplied.
    Missing(String),
    /// An attribute was supplied but empty (or whitespace-only).
    Empty(String),
    /// An attribute the content type's schema does not recognize.
    Unknown(String),
    /// The content type requires an accompanying file and none was supplied.
    MissingFile,
    /// An update patch with no fields at all.
    EmptyPatch,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required field: {name}"),
            Self::Empty(name) => write!(f, "field is empty: {name}"),
            Self::Unknown(name) => write!(f, "unknown field: {name}"),
            Self::MissingFile => write!(f, "an uploaded file is required"),
            Self::EmptyPatch => write!(f, "patch contains no fields"),
        }
    }
}

/// Validation failure carrying the complete list of field problems.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("validation failed for {content_type}: {}", format_errors(.errors))]
pub struct ValidationError {
    /// The content type the submission was validated against.
    pub content_type: ContentType,
    /// Every problem found, in schema order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Names of required fields that were missing, sorted.
    pub fn missing_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| match e {
                FieldError::Missing(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if the only problem is a missing file.
    pub fn is_missing_file_only(&self) -> bool {
        self.errors == [FieldError::MissingFile]
    }
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
