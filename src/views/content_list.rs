use crate::{
    error::{ClientError, Result},
    models::{
        author::{Author, AuthorCache, UNKNOWN_AUTHOR},
        content::{ContentRecord, ContentUpdate},
        search::{SearchQuery, SearchScope},
    },
    services::{
        api::SharedApi, author::AuthorResolver, bookmark::BookmarkEvent,
        search::SearchFilterEngine,
    },
    state::ViewContext,
    views::{BookmarkSink, LoadState, ViewLifecycle},
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
struct ContentListState {
    records: Vec<ContentRecord>,
    authors: AuthorCache,
    load: LoadState,
    query: SearchQuery,
    /// 每次加载递增，旧加载的结果不再应用
    generation: u64,
    /// 本次加载开始后确认的书签值，安装新列表时覆盖服务端快照
    confirmed: HashMap<String, bool>,
}

/// 博客列表视图
/// 加载一次内容、补全作者、按查询过滤，并把书签事件应用到自己的副本
#[derive(Clone)]
pub struct ContentListView {
    context: Arc<RwLock<ViewContext>>,
    api: SharedApi,
    resolver: AuthorResolver,
    engine: SearchFilterEngine,
    state: Arc<RwLock<ContentListState>>,
    lifecycle: Arc<ViewLifecycle>,
}

impl ContentListView {
    pub fn new(context: ViewContext, api: SharedApi, engine: SearchFilterEngine) -> Self {
        Self {
            context: Arc::new(RwLock::new(context)),
            resolver: AuthorResolver::new(api.clone()),
            api,
            engine,
            state: Arc::new(RwLock::new(ContentListState::default())),
            lifecycle: ViewLifecycle::new(),
        }
    }

    pub fn context(&self) -> ViewContext {
        self.context.read().clone()
    }

    pub fn resize(&self, viewport_width: u32) {
        let mut context = self.context.write();
        *context = context.resized(viewport_width);
    }

    pub fn is_mobile(&self) -> bool {
        self.context.read().is_mobile()
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// 加载内容并补全作者
    /// 内容失败时进入可重试的 `Failed`；作者失败只影响对应作者的显示
    pub async fn load(&self) -> LoadState {
        if !self.lifecycle.is_mounted() {
            return self.load_state();
        }

        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.load = LoadState::Loading;
            state.confirmed.clear();
            state.generation
        };

        let fetched = self.api.fetch_content_list().await;

        let records = {
            let mut state = self.state.write();
            if !self.lifecycle.is_mounted() || state.generation != generation {
                debug!("Discarding content list that arrived after unmount or reload");
                return state.load.clone();
            }

            let mut records = match fetched {
                Ok(records) => records,
                Err(e) => {
                    error!("Error fetching blogs: {}", e);
                    let failed =
                        LoadState::Failed(format!("Failed to load blogs: {}", e.user_message()));
                    state.records.clear();
                    state.authors.clear();
                    state.load = failed.clone();
                    return failed;
                }
            };

            for record in records.iter_mut() {
                if let Some(&bookmarked) = state.confirmed.get(&record.id) {
                    record.bookmarked = bookmarked;
                }
            }

            info!("Loaded {} blogs", records.len());
            state.records = records.clone();
            state.authors.clear();
            state.load = LoadState::Ready;
            records
        };

        let authors = self.resolver.resolve_authors(&records).await;
        let mut state = self.state.write();
        if self.lifecycle.is_mounted() && state.generation == generation {
            state.authors = authors;
        } else {
            debug!("Discarding authors that arrived after unmount or reload");
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

    pub fn record(&self, record_id: &str) -> Option<ContentRecord> {
        self.state
            .read()
            .records
            .iter()
            .find(|record| record.id == record_id)
            .cloned()
    }

    pub fn author_of(&self, record: &ContentRecord) -> Option<Author> {
        self.state.read().authors.get(&record.author_key).cloned()
    }

    /// 卡片上的作者名，未知时为 "Unknown Author"
    pub fn author_name(&self, record: &ContentRecord) -> String {
        self.state
            .read()
            .authors
            .display_name(&record.author_key, UNKNOWN_AUTHOR)
            .to_string()
    }

    pub fn authors_ready(&self) -> bool {
        self.state.read().authors.is_ready()
    }

    pub fn query(&self) -> SearchQuery {
        self.state.read().query.clone()
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.state.write().query.text = text.into();
    }

    pub fn set_scope(&self, scope: SearchScope) {
        self.state.write().query.scope = scope;
    }

    pub fn clear_search(&self) {
        self.state.write().query.clear();
    }

    /// 当前查询下可见的文章，保持加载顺序
    /// 作者尚未解析完成时，按作者搜索不会命中
    pub fn visible(&self) -> Vec<ContentRecord> {
        let state = self.state.read();
        self.engine
            .filter_owned(&state.records, &state.authors, &state.query)
    }

    /// 卡片上显示的日期
    pub fn display_date(&self, record: &ContentRecord) -> String {
        self.engine.date_formatter().format(&record.created_at)
    }

    /// 删除自己的文章；成功后从列表移除
    pub async fn delete(&self, record_id: &str) -> Result<()> {
        let token = self.session_token()?;

        self.api.delete_content(record_id, &token).await.map_err(|e| {
            error!("Error deleting blog {}: {}", record_id, e);
            e
        })?;

        if self.lifecycle.is_mounted() {
            self.state
                .write()
                .records
                .retain(|record| record.id != record_id);
        }
        info!("Deleted blog {}", record_id);
        Ok(())
    }

    /// 编辑自己的文章；成功后用服务端返回的版本原位替换，列表顺序不变
    /// 书签标记按查看者计算，保留列表中已有的值
    pub async fn update(&self, record_id: &str, changes: &ContentUpdate) -> Result<ContentRecord> {
        let token = self.session_token()?;
        if changes.is_empty() {
            return Err(ClientError::api("Nothing to update"));
        }

        let mut updated = self
            .api
            .update_content(record_id, changes, &token)
            .await
            .map_err(|e| {
                error!("Error updating blog {}: {}", record_id, e);
                e
            })?;

        if !self.lifecycle.is_mounted() {
            return Ok(updated);
        }

        let (records, mut authors, generation) = {
            let mut state = self.state.write();
            if let Some(slot) = state.records.iter_mut().find(|record| record.id == record_id) {
                updated.bookmarked = slot.bookmarked;
                *slot = updated.clone();
            }
            (state.records.clone(), state.authors.clone(), state.generation)
        };
        info!("Updated blog {}", record_id);

        // 作者解析尚未完成时由加载流程负责
        if authors.is_ready() {
            self.resolver.resolve_missing(&records, &mut authors).await;
            let mut state = self.state.write();
            if self.lifecycle.is_mounted() && state.generation == generation {
                state.authors = authors;
            }
        }
        Ok(updated)
    }

    /// 卸载视图：丢弃列表和作者缓存，之后到达的结果不再应用
    pub fn unmount(&self) {
        self.lifecycle.unmount();
        let mut state = self.state.write();
        state.records.clear();
        state.authors.clear();
        state.confirmed.clear();
        state.load = LoadState::Idle;
    }

    fn session_token(&self) -> Result<String> {
        self.context
            .read()
            .session
            .token()
            .map(str::to_string)
            .ok_or(ClientError::AuthRequired)
    }
}

#[async_trait]
impl BookmarkSink for ContentListView {
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
        match state.records.iter_mut().find(|record| record.id == event.record_id) {
            Some(record) if record.bookmarked != event.bookmarked => {
                record.bookmarked = event.bookmarked;
                true
            }
            _ => false,
        }
    }

    async fn resync(&self) {
        self.load().await;
    }
}
