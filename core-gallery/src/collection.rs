//! Ordered, de-duplicated list of gallery records.

use bridge_traits::ImageRecord;
use std::collections::HashSet;

/// Records in fetch order with unique ids.
///
/// A record whose id is already present is dropped, whether the duplicate
/// comes from the same page or a later one. The first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryCollection {
    items: Vec<ImageRecord>,
    ids: HashSet<String>,
}

impl GalleryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a single page
    pub fn from_page(items: Vec<ImageRecord>) -> Self {
        let mut collection = Self::new();
        collection.extend(items);
        collection
    }

    /// Append records to the tail, skipping known ids. Returns how many were added.
    pub fn extend(&mut self, items: impl IntoIterator<Item = ImageRecord>) -> usize {
        let before = self.items.len();
        for record in items {
            if self.ids.insert(record.id.clone()) {
                self.items.push(record);
            }
        }
        self.items.len() - before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    pub fn items(&self) -> &[ImageRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
