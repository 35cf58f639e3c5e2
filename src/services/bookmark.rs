use crate::{
    error::{ClientError, Result},
    models::content::ContentRecord,
    services::api::SharedApi,
    state::Session,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 单篇文章的书签状态
/// 只有在途请求会被协调器记录；其余时间以视图持有的服务端值为准
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkPhase {
    Idle(bool),
    /// 请求进行中；显示值为 `!previous`
    Toggling { previous: bool },
}

impl BookmarkPhase {
    pub fn displayed(&self) -> bool {
        match *self {
            BookmarkPhase::Idle(value) => value,
            BookmarkPhase::Toggling { previous } => !previous,
        }
    }

    pub fn is_toggling(&self) -> bool {
        matches!(self, BookmarkPhase::Toggling { .. })
    }
}

/// 服务端确认后的书签变更，广播给所有持有该文章的视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkEvent {
    pub record_id: String,
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Settled(bool),
    /// 同一文章已有请求在途，本次请求被忽略
    Ignored,
}

/// 在途请求：文章 ID -> 翻转前的值
type InFlightMap = Arc<Mutex<HashMap<String, bool>>>;

#[derive(Clone)]
pub struct BookmarkCoordinator {
    api: SharedApi,
    session: Session,
    in_flight: InFlightMap,
    events: broadcast::Sender<BookmarkEvent>,
}

impl BookmarkCoordinator {
    pub fn new(api: SharedApi, session: Session) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            session,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookmarkEvent> {
        self.events.subscribe()
    }

    /// 视图持有的 `record` 是服务端确认值；在途时叠加乐观值
    pub fn phase(&self, record: &ContentRecord) -> BookmarkPhase {
        match self.in_flight.lock().get(&record.id) {
            Some(&previous) => BookmarkPhase::Toggling { previous },
            None => BookmarkPhase::Idle(record.bookmarked),
        }
    }

    /// 当前应显示的书签状态
    pub fn displayed(&self, record: &ContentRecord) -> bool {
        self.phase(record).displayed()
    }

    pub fn is_toggling(&self, record_id: &str) -> bool {
        self.in_flight.lock().contains_key(record_id)
    }

    /// 翻转书签：一次请求，结果由服务端决定
    /// 未登录时直接返回 `AuthRequired`，不发请求；失败时显示值回到 `record.bookmarked`
    pub async fn toggle(&self, record: &ContentRecord) -> Result<ToggleOutcome> {
        let token = match self.session.token() {
            Some(token) => token.to_string(),
            None => {
                warn!("Bookmark toggle for {} rejected: not logged in", record.id);
                return Err(ClientError::AuthRequired);
            }
        };

        let guard = match self.begin(record) {
            Some(guard) => guard,
            None => {
                debug!("Bookmark toggle for {} already in flight, ignoring", record.id);
                return Ok(ToggleOutcome::Ignored);
            }
        };

        let result = self.api.toggle_bookmark(&record.id, &token).await;
        drop(guard);

        match result {
            Ok(bookmarked) => {
                info!("Bookmark for {} settled: {}", record.id, bookmarked);

                let event = BookmarkEvent {
                    record_id: record.id.clone(),
                    bookmarked,
                };
                if self.events.send(event).is_err() {
                    debug!("No views subscribed to bookmark updates");
                }
                Ok(ToggleOutcome::Settled(bookmarked))
            }
            Err(e) => {
                warn!("Error updating bookmark for {}: {}", record.id, e);
                Err(e)
            }
        }
    }

    /// 与 `toggle` 相同，并在确认后回调 `on_settled(record_id, bookmarked)`
    pub async fn toggle_with<F>(&self, record: &ContentRecord, on_settled: F) -> Result<ToggleOutcome>
    where
        F: FnOnce(&str, bool),
    {
        let outcome = self.toggle(record).await?;
        if let ToggleOutcome::Settled(bookmarked) = outcome {
            on_settled(&record.id, bookmarked);
        }
        Ok(outcome)
    }

    fn begin(&self, record: &ContentRecord) -> Option<InFlight> {
        let mut in_flight = self.in_flight.lock();
        if in_flight.contains_key(&record.id) {
            return None;
        }
        in_flight.insert(record.id.clone(), record.bookmarked);

        Some(InFlight {
            in_flight: self.in_flight.clone(),
            record_id: record.id.clone(),
        })
    }
}

/// 在途请求守卫
/// 无论成功、失败还是 future 被丢弃，离开作用域即清除在途标记
struct InFlight {
    in_flight: InFlightMap,
    record_id: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.record_id);
    }
}
