//! Upload draft and its local validation rules.

use bytes::Bytes;

use crate::error::{FieldViolation, ValidationErrors};

/// Mime types the gallery accepts.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

/// Files must be strictly smaller than this many bytes.
pub const MAX_FILE_BYTES: u64 = 10_000_000;

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 20;
pub const DESCRIPTION_MIN_CHARS: usize = 1;
pub const DESCRIPTION_MAX_CHARS: usize = 20;

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    pub data: Bytes,
    /// Declared mime type, e.g. `image/png`
    pub mime_type: String,
    /// Original file name, forwarded to the object store when present
    pub name: Option<String>,
}

impl DraftFile {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Unsaved user input for one submission attempt.
///
/// The pipeline only borrows a draft, so it is still available for
/// correction after a failed submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadDraft {
    pub file: Option<DraftFile>,
    pub title: String,
    pub description: String,
}

impl UploadDraft {
    pub fn new(file: DraftFile, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Check every rule and report all violations at once.
///
/// Lengths are counted in characters, without trimming. Pure function; no
/// I/O.
pub fn validate_draft(draft: &UploadDraft) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    match &draft.file {
        None => violations.push(FieldViolation::FileRequired),
        Some(file) => {
            if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
                violations.push(FieldViolation::UnsupportedFormat);
            }
            if file.size() >= MAX_FILE_BYTES {
                violations.push(FieldViolation::FileTooLarge);
            }
        }
    }

    let title_len = draft.title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
        violations.push(FieldViolation::TitleLength);
    }

    let description_len = draft.description.chars().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&description_len) {
        violations.push(FieldViolation::DescriptionLength);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(violations))
    }
}
