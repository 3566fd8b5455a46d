use bridge_traits::BridgeError;
use std::fmt;
use thiserror::Error;

/// Errors from the read path.
///
/// `Clone` so the failure can live inside [`PaginationState::Failed`](crate::PaginationState::Failed)
/// and be handed to every view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("A gallery fetch is already in flight")]
    FetchInProgress,

    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status when the service answered with a non-2xx code
        status: Option<u16>,
    },
}

impl PaginationError {
    /// Precondition failures are rejected before any network call is made
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PaginationError::FetchInProgress | PaginationError::InvalidState { .. }
        )
    }
}

impl From<BridgeError> for PaginationError {
    fn from(error: BridgeError) -> Self {
        PaginationError::Network {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

/// One violated rule of the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldViolation {
    FileRequired,
    UnsupportedFormat,
    FileTooLarge,
    TitleLength,
    DescriptionLength,
}

impl FieldViolation {
    /// Form field the violation belongs to
    pub fn field(&self) -> &'static str {
        match self {
            FieldViolation::FileRequired
            | FieldViolation::UnsupportedFormat
            | FieldViolation::FileTooLarge => "file",
            FieldViolation::TitleLength => "title",
            FieldViolation::DescriptionLength => "description",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldViolation::FileRequired => "file required",
            FieldViolation::UnsupportedFormat => "unsupported format",
            FieldViolation::FileTooLarge => "file too large",
            FieldViolation::TitleLength => "title length",
            FieldViolation::DescriptionLength => "description length",
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every violation found in a draft, in field order (file, title, description).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn contains(&self, violation: FieldViolation) -> bool {
        self.violations.contains(&violation)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations for a single form field, for inline error display
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = FieldViolation> + 'a {
        self.violations
            .iter()
            .copied()
            .filter(move |v| v.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.as_str()).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors from the write path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The object store failed; nothing was stored, retrying is safe
    #[error("Upload failed: {message}")]
    Upload { message: String },

    /// The file is stored at `orphaned_url` but no record references it
    #[error("Registration failed: {message} (orphaned file: {orphaned_url})")]
    Registration {
        message: String,
        orphaned_url: String,
    },

    #[error("An upload is already in progress")]
    InProgress,
}

impl UploadError {
    /// Stage label used in events and logs
    pub fn stage(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "validation",
            UploadError::Upload { .. } => "upload",
            UploadError::Registration { .. } => "registration",
            UploadError::InProgress => "submit",
        }
    }

    pub fn orphaned_url(&self) -> Option<&str> {
        match self {
            UploadError::Registration { orphaned_url, .. } => Some(orphaned_url),
            _ => None,
        }
    }
}
