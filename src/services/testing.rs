//! 单元测试使用的内存 `BlogApi` 实现

use crate::{
    error::{ClientError, Result},
    models::{
        author::Author,
        content::{ContentRecord, ContentUpdate},
        response::SessionUser,
    },
    services::api::BlogApi,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Default)]
pub struct InMemoryApi {
    pub authors: Mutex<HashMap<String, Author>>,
    pub failing_authors: Mutex<HashSet<String>>,
    pub content: Mutex<Vec<ContentRecord>>,
    pub bookmarks: Mutex<HashSet<String>>,
    pub fail_content: AtomicBool,
    pub fail_bookmark: AtomicBool,
    /// 设置后，书签请求需要拿到许可才会返回
    pub bookmark_gate: Mutex<Option<Arc<Semaphore>>>,
    /// 设置后，内容请求需要拿到许可才会返回；响应在等待前生成
    pub content_gate: Mutex<Option<Arc<Semaphore>>>,
    pub calls: Mutex<Vec<String>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_author(self, author: Author) -> Self {
        self.authors.lock().insert(author.id.clone(), author);
        self
    }

    pub fn with_failing_author(self, author_key: &str) -> Self {
        self.failing_authors.lock().insert(author_key.to_string());
        self
    }

    pub fn with_content(self, records: Vec<ContentRecord>) -> Self {
        *self.content.lock() = records;
        self
    }

    pub fn with_bookmarks(self, ids: &[&str]) -> Self {
        self.bookmarks
            .lock()
            .extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn gate_bookmarks(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.bookmark_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn gate_content(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.content_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    /// 按当前书签集合计算 `bookmarked`
    fn snapshot(&self, record: &ContentRecord) -> ContentRecord {
        let bookmarked = self.bookmarks.lock().contains(&record.id);
        record.clone().with_bookmarked(bookmarked)
    }
}

async fn pass_gate(gate: Option<Arc<Semaphore>>) -> Result<()> {
    if let Some(gate) = gate {
        let permit = gate
            .acquire()
            .await
            .map_err(|e| ClientError::Internal(e.to_string()))?;
        permit.forget();
    }
    Ok(())
}

#[async_trait]
impl BlogApi for InMemoryApi {
    async fn fetch_author(&self, author_key: &str) -> Result<Author> {
        self.record(format!("author:{}", author_key));
        tokio::task::yield_now().await;

        if self.failing_authors.lock().contains(author_key) {
            return Err(ClientError::Status {
                status: 500,
                endpoint: "GET /authors/{key}".to_string(),
            });
        }
        self.authors
            .lock()
            .get(author_key)
            .cloned()
            .ok_or_else(|| ClientError::api("Author not found"))
    }

    async fn fetch_content_list(&self) -> Result<Vec<ContentRecord>> {
        self.record("content:list".to_string());
        let records: Vec<ContentRecord> = self
            .content
            .lock()
            .iter()
            .map(|record| self.snapshot(record))
            .collect();

        let gate = self.content_gate.lock().clone();
        pass_gate(gate).await?;
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(ClientError::api("Failed to load blogs"));
        }
        Ok(records)
    }

    async fn fetch_content(&self, content_id: &str) -> Result<ContentRecord> {
        self.record(format!("content:{}", content_id));
        let found = self
            .content
            .lock()
            .iter()
            .find(|record| record.id == content_id)
            .map(|record| self.snapshot(record));

        let gate = self.content_gate.lock().clone();
        pass_gate(gate).await?;
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(ClientError::api("Failed to load blog"));
        }
        found.ok_or_else(|| ClientError::api("Blog not found"))
    }

    async fn toggle_bookmark(&self, content_id: &str, _token: &str) -> Result<bool> {
        self.record(format!("bookmark:{}", content_id));

        let gate = self.bookmark_gate.lock().clone();
        pass_gate(gate).await?;

        if self.fail_bookmark.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                endpoint: "PUT /content/{id}/bookmark".to_string(),
            });
        }

        let mut bookmarks = self.bookmarks.lock();
        if bookmarks.remove(content_id) {
            Ok(false)
        } else {
            bookmarks.insert(content_id.to_string());
            Ok(true)
        }
    }

    async fn fetch_session_user(&self, _token: &str) -> Result<SessionUser> {
        self.record("session:user".to_string());
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(ClientError::api("Failed to load user"));
        }
        let mut bookmarks: Vec<String> = self.bookmarks.lock().iter().cloned().collect();
        bookmarks.sort();
        Ok(SessionUser {
            id: "me".to_string(),
            bookmarks,
        })
    }

    async fn delete_content(&self, content_id: &str, _token: &str) -> Result<()> {
        self.record(format!("delete:{}", content_id));
        let mut content = self.content.lock();
        let before = content.len();
        content.retain(|record| record.id != content_id);
        if content.len() == before {
            return Err(ClientError::api("Blog not found"));
        }
        Ok(())
    }

    async fn update_content(
        &self,
        content_id: &str,
        changes: &ContentUpdate,
        _token: &str,
    ) -> Result<ContentRecord> {
        self.record(format!("update:{}", content_id));
        let mut content = self.content.lock();
        let record = content
            .iter_mut()
            .find(|record| record.id == content_id)
            .ok_or_else(|| ClientError::api("Blog not found"))?;
        changes.apply_to(record);
        // 编辑接口的响应不带查看者的书签标记
        Ok(record.clone().with_bookmarked(false))
    }
}
