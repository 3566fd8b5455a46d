//! Which image is enlarged in the preview overlay.

use bridge_traits::ImageRecord;

/// At most one previewed record plus a visibility flag.
///
/// `dismiss` hides the preview but keeps the record so it can be reopened
/// without another lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSelection {
    record: Option<ImageRecord>,
    visible: bool,
}

impl PreviewSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, record: ImageRecord) {
        self.record = Some(record);
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Show the last selected record again. Returns `false` if nothing was
    /// ever selected.
    pub fn reopen(&mut self) -> bool {
        self.visible = self.record.is_some();
        self.visible
    }

    /// Last selected record and whether it is on screen
    pub fn current(&self) -> (Option<&ImageRecord>, bool) {
        (self.record.as_ref(), self.visible)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Link for the "open original" action, only while the preview is shown
    pub fn original_url(&self) -> Option<&str> {
        if !self.visible {
            return None;
        }
        self.record.as_ref().map(|r| r.url.as_str())
    }
}
