//! Hand-written fakes shared by the gallery integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    GalleryBackend, ImagePage, ImageRecord, NewImage, ObjectStore,
};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};

pub fn record(id: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        title: format!("Image {}", id),
        description: "from the gallery".to_string(),
        url: format!("https://i.ibb.co/{}/image.png", id),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

pub fn page(ids: &[&str], next: Option<&str>) -> ImagePage {
    ImagePage::new(ids.iter().map(|id| record(id)).collect(), next.map(str::to_string))
}

pub fn server_error() -> BridgeError {
    BridgeError::Rejected {
        status: 500,
        message: "internal server error".to_string(),
    }
}

/// Gate that holds calls until the test releases them.
///
/// Ungated fakes start with a large number of permits.
struct Gate {
    permits: Semaphore,
    started: Notify,
}

impl Gate {
    fn open() -> Self {
        Self {
            permits: Semaphore::new(Semaphore::MAX_PERMITS / 2),
            started: Notify::new(),
        }
    }

    fn closed() -> Self {
        Self {
            permits: Semaphore::new(0),
            started: Notify::new(),
        }
    }

    async fn pass(&self) {
        self.started.notify_waiters();
        self.permits
            .acquire()
            .await
            .expect("gate semaphore closed")
            .forget();
    }
}

/// Gallery backend with scripted listing and registration results.
///
/// Results are taken at call time, in call order, before the gate is awaited.
pub struct FakeBackend {
    pages: Mutex<VecDeque<BridgeResult<ImagePage>>>,
    records: Mutex<VecDeque<BridgeResult<ImageRecord>>>,
    cursors: Mutex<Vec<Option<String>>>,
    registered: Mutex<Vec<NewImage>>,
    list_calls: AtomicUsize,
    gate: Gate,
}

impl FakeBackend {
    pub fn new(pages: Vec<BridgeResult<ImagePage>>) -> Self {
        Self::build(pages, Gate::open())
    }

    /// Every listing call blocks until [`release`](Self::release)
    pub fn gated(pages: Vec<BridgeResult<ImagePage>>) -> Self {
        Self::build(pages, Gate::closed())
    }

    fn build(pages: Vec<BridgeResult<ImagePage>>, gate: Gate) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            records: Mutex::new(VecDeque::new()),
            cursors: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            gate,
        }
    }

    pub fn push_page(&self, page: BridgeResult<ImagePage>) {
        self.pages.lock().push_back(page);
    }

    pub fn push_record(&self, record: BridgeResult<ImageRecord>) {
        self.records.lock().push_back(record);
    }

    pub fn release(&self, calls: usize) {
        self.gate.permits.add_permits(calls);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().clone()
    }

    pub fn registered(&self) -> Vec<NewImage> {
        self.registered.lock().clone()
    }

    /// Resolves once `n` listing calls have started
    pub async fn wait_for_list_calls(&self, n: usize) {
        loop {
            let started = self.gate.started.notified();
            if self.list_calls() >= n {
                return;
            }
            started.await;
        }
    }
}

#[async_trait]
impl GalleryBackend for FakeBackend {
    async fn list_images(&self, cursor: Option<String>) -> BridgeResult<ImagePage> {
        self.cursors.lock().push(cursor);
        let result = self
            .pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no scripted page".into())));
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        self.gate.pass().await;
        result
    }

    async fn create_image_record(&self, image: NewImage) -> BridgeResult<ImageRecord> {
        self.registered.lock().push(image);
        self.records
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no scripted record".into())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub size: usize,
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// Object store with scripted results.
pub struct FakeObjectStore {
    results: Mutex<VecDeque<BridgeResult<String>>>,
    uploads: Mutex<Vec<StoredFile>>,
    calls: AtomicUsize,
    gate: Gate,
}

impl FakeObjectStore {
    pub fn new(results: Vec<BridgeResult<String>>) -> Self {
        Self::build(results, Gate::open())
    }

    pub fn gated(results: Vec<BridgeResult<String>>) -> Self {
        Self::build(results, Gate::closed())
    }

    fn build(results: Vec<BridgeResult<String>>, gate: Gate) -> Self {
        Self {
            results: Mutex::new(results.into()),
            uploads: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate,
        }
    }

    pub fn release(&self, calls: usize) {
        self.gate.permits.add_permits(calls);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<StoredFile> {
        self.uploads.lock().clone()
    }

    pub async fn wait_for_calls(&self, n: usize) {
        loop {
            let started = self.gate.started.notified();
            if self.calls() >= n {
                return;
            }
            started.await;
        }
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn upload_file(
        &self,
        data: Bytes,
        mime_type: &str,
        file_name: Option<&str>,
    ) -> BridgeResult<String> {
        self.uploads.lock().push(StoredFile {
            size: data.len(),
            mime_type: mime_type.to_string(),
            file_name: file_name.map(str::to_string),
        });
        let result = self
            .results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no scripted upload".into())));
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.gate.pass().await;
        result
    }
}
