use crate::{
    models::{
        author::{Author, AuthorCache},
        content::ContentRecord,
    },
    services::{api::SharedApi, author::AuthorResolver, bookmark::BookmarkEvent},
    state::ViewContext,
    views::{BookmarkSink, LoadState, ViewLifecycle},
};
use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct BookmarksState {
    records: Vec<ContentRecord>,
    authors: AuthorCache,
    load: LoadState,
    generation: u64,
    /// 本次加载开始后确认的书签值
    confirmed: HashMap<String, bool>,
}

/// "我的书签"视图
/// 取消收藏确认后直接把文章移出列表，而不是只翻转标记
#[derive(Clone)]
pub struct BookmarksView {
    context: ViewContext,
    api: SharedApi,
    resolver: AuthorResolver,
    state: Arc<RwLock<BookmarksState>>,
    lifecycle: Arc<ViewLifecycle>,
}

impl BookmarksView {
    pub fn new(context: ViewContext, api: SharedApi) -> Self {
        Self {
            context,
            resolver: AuthorResolver::new(api.clone()),
            api,
            state: Arc::new(RwLock::new(BookmarksState::default())),
            lifecycle: ViewLifecycle::new(),
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// 拉取当前用户的书签 ID，再逐篇拉取文章
    /// 未登录时不发请求，直接进入 `Failed`
    pub async fn load(&self) -> LoadState {
        if !self.lifecycle.is_mounted() {
            return self.load_state();
        }

        let token = match self.context.session.token() {
            Some(token) => token.to_string(),
            None => {
                let failed = LoadState::Failed("Please log in to view bookmarks".to_string());
                self.state.write().load = failed.clone();
                return failed;
            }
        };

        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.load = LoadState::Loading;
            state.confirmed.clear();
            state.generation
        };

        let user = match self.api.fetch_session_user(&token).await {
            Ok(user) => user,
            Err(e) => {
                error!("Error fetching bookmarks: {}", e);
                return self.fail(generation, "Failed to load bookmarks");
            }
        };

        let content_ids = unique_ids(&user.bookmarks);
        let fetches = content_ids
            .iter()
            .map(|content_id| self.api.fetch_content(content_id));
        let results = join_all(fetches).await;

        let records: Vec<ContentRecord> = content_ids
            .iter()
            .zip(results)
            .filter_map(|(content_id, result)| match result {
                Ok(record) => Some(record.with_bookmarked(true)),
                Err(e) => {
                    warn!("Skipping bookmarked blog {}: {}", content_id, e);
                    None
                }
            })
            .collect();

        let records = {
            let mut state = self.state.write();
            if !self.lifecycle.is_mounted() || state.generation != generation {
                debug!("Discarding bookmarks that arrived after unmount or reload");
                return state.load.clone();
            }

            // 加载期间确认取消收藏的文章不再显示
            let records: Vec<ContentRecord> = records
                .into_iter()
                .filter(|record| state.confirmed.get(&record.id) != Some(&false))
                .collect();

            info!("Loaded {} of {} bookmarked blogs", records.len(), content_ids.len());
            state.records = records.clone();
            state.authors.clear();
            state.load = LoadState::Ready;
            records
        };

        if records.is_empty() {
            return LoadState::Ready;
        }

        let authors = self.resolver.resolve_authors(&records).await;
        let mut state = self.state.write();
        if self.lifecycle.is_mounted() && state.generation == generation {
            state.authors = authors;
        }
        state.load.clone()
    }

    pub async fn retry(&self) -> LoadState {
        self.load().await
    }

    pub fn load_state(&self) -> LoadState {
        self.state.read().load.clone()
    }

    pub fn records(&self) -> Vec<ContentRecord> {
        self.state.read().records.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    pub fn author_of(&self, record: &ContentRecord) -> Option<Author> {
        self.state.read().authors.get(&record.author_key).cloned()
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
        let mut state = self.state.write();
        state.records.clear();
        state.authors.clear();
        state.confirmed.clear();
        state.load = LoadState::Idle;
    }

    fn fail(&self, generation: u64, message: &str) -> LoadState {
        let mut state = self.state.write();
        if !self.lifecycle.is_mounted() || state.generation != generation {
            return state.load.clone();
        }
        let failed = LoadState::Failed(message.to_string());
        state.records.clear();
        state.authors.clear();
        state.load = failed.clone();
        failed
    }
}

/// 书签 ID 去重，保持首次出现顺序
fn unique_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

#[async_trait]
impl BookmarkSink for BookmarksView {
    fn lifecycle(&self) -> &ViewLifecycle {
        &self.lifecycle
    }

    fn apply_bookmark_event(&self, event: &BookmarkEvent) -> bool {
        if !self.lifecycle.is_mounted() {
            return false;
        }
        let mut state = self.state.write();
        state
            .confirmed
            .insert(event.record_id.clone(), event.bookmarked);
        if event.bookmarked {
            return false;
        }
        let before = state.records.len();
        state.records.retain(|record| record.id != event.record_id);
        state.records.len() != before
    }

    async fn resync(&self) {
        self.load().await;
    }
}
