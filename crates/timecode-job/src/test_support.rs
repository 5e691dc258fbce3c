//! In-process fakes for the job's trait seams.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use timecode_models::VideoId;
use timecode_storage::{ObjectStore, StorageError, StorageResult};
use timecode_youtube::{SearchPage, VideoSnippet, VideoSource, YouTubeError, YouTubeResult};

/// Video source that replays scripted pages and snippets.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<YouTubeResult<SearchPage>>>,
    snippets: HashMap<String, Result<VideoSnippet, u16>>,
    panic_on: Option<String>,
    pub search_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
    pub page_tokens: Mutex<Vec<Option<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a search page with the given ids and continuation token.
    pub fn page(mut self, ids: &[&str], next: Option<&str>) -> Self {
        let page = SearchPage {
            video_ids: ids.iter().map(|id| VideoId::from(*id)).collect(),
            skipped: 0,
            next_page_token: next.map(str::to_string),
        };
        self.pages.get_mut().unwrap().push_back(Ok(page));
        self
    }

    /// Queue a failing search page.
    pub fn failing_page(mut self, status: u16) -> Self {
        self.pages
            .get_mut()
            .unwrap()
            .push_back(Err(YouTubeError::from_http_status(status, "scripted failure")));
        self
    }

    /// Register a successful lookup.
    pub fn video(mut self, id: &str, description: &str) -> Self {
        self.snippets.insert(
            id.to_string(),
            Ok(VideoSnippet {
                title: format!("Title {}", id),
                description: description.to_string(),
                thumbnail_url: format!("https://img.example/{}.jpg", id),
            }),
        );
        self
    }

    /// Register a lookup that fails with the given HTTP status.
    pub fn failing_video(mut self, id: &str, status: u16) -> Self {
        self.snippets.insert(id.to_string(), Err(status));
        self
    }

    /// Panic when this id is looked up.
    pub fn panicking_video(mut self, id: &str) -> Self {
        self.panic_on = Some(id.to_string());
        self
    }
}

#[async_trait]
impl VideoSource for ScriptedSource {
    async fn search_page(&self, page_token: Option<&str>) -> YouTubeResult<SearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.page_tokens
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::default()))
    }

    async fn video_snippet(&self, video_id: &VideoId) -> YouTubeResult<VideoSnippet> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on.as_deref() == Some(video_id.as_str()) {
            panic!("scripted panic for {}", video_id);
        }
        match self.snippets.get(video_id.as_str()) {
            Some(Ok(snippet)) => Ok(snippet.clone()),
            Some(Err(status)) => Err(YouTubeError::from_http_status(*status, "scripted failure")),
            None => Err(YouTubeError::not_found(video_id.as_str())),
        }
    }
}

/// Object store that keeps objects in memory, optionally failing every write.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn location(&self) -> String {
        "memory://test".to_string()
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::upload_failed("scripted upload failure"));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::RequestFailed("unreachable".to_string()));
        }
        Ok(())
    }
}
