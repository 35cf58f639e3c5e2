pub mod bookmarks;
pub mod content_list;

pub use bookmarks::BookmarksView;
pub use content_list::ContentListView;

use crate::services::bookmark::BookmarkEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 视图加载状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// 可重试的错误，附带面向用户的提示
    Failed(String),
}

impl LoadState {
    pub fn can_retry(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// 视图挂载状态
/// 卸载后到达的异步结果一律丢弃
#[derive(Debug)]
pub struct ViewLifecycle {
    mounted: watch::Sender<bool>,
}

impl ViewLifecycle {
    pub fn new() -> Arc<Self> {
        let (mounted, _) = watch::channel(true);
        Arc::new(Self { mounted })
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }

    fn watch(&self) -> watch::Receiver<bool> {
        self.mounted.subscribe()
    }
}

/// 接收书签确认事件的视图
/// 每个视图自行决定如何把事件应用到自己持有的列表
#[async_trait]
pub trait BookmarkSink: Clone + Send + Sync + 'static {
    fn lifecycle(&self) -> &ViewLifecycle;

    /// 应用一次书签变更；返回视图数据是否改变
    fn apply_bookmark_event(&self, event: &BookmarkEvent) -> bool;

    /// 丢失事件后重新向服务端同步
    async fn resync(&self);

    /// 处理所有已到达的事件，返回改变数据的事件数
    /// 接收端落后导致事件丢失时，处理完剩余事件后整体重新加载
    async fn sync_bookmarks(&self, events: &mut broadcast::Receiver<BookmarkEvent>) -> usize {
        let mut changed = 0;
        let mut lagged = false;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    if self.apply_bookmark_event(&event) {
                        changed += 1;
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Bookmark listener lagged, {} updates skipped; reloading", skipped);
                    lagged = true;
                }
                Err(_) => break,
            }
        }
        if lagged {
            self.resync().await;
        }
        changed
    }

    /// 后台监听书签事件，直到视图卸载或通道关闭
    fn spawn_bookmark_listener(
        &self,
        mut events: broadcast::Receiver<BookmarkEvent>,
    ) -> JoinHandle<()> {
        let view = self.clone();
        let mut mounted = view.lifecycle().watch();

        tokio::spawn(async move {
            loop {
                if !*mounted.borrow() {
                    break;
                }
                tokio::select! {
                    changed = mounted.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    received = events.recv() => match received {
                        Ok(event) => {
                            view.apply_bookmark_event(&event);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("Bookmark listener lagged, {} updates skipped; reloading", skipped);
                            view.resync().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("Bookmark listener stopped");
        })
    }
}
