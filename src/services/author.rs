use crate::{
    models::{author::AuthorCache, content::ContentRecord},
    services::api::SharedApi,
};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 作者解析器
/// 对一批文章引用的作者去重后并发拉取，每个作者键每次调用最多请求一次
#[derive(Clone)]
pub struct AuthorResolver {
    api: SharedApi,
}

impl AuthorResolver {
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }

    /// 解析全部作者，返回已就绪的缓存
    /// 单个作者失败只会导致该键缺失，整体调用不会失败
    pub async fn resolve_authors(&self, records: &[ContentRecord]) -> AuthorCache {
        let keys = unique_author_keys(records);
        let mut cache = AuthorCache::new();
        self.fetch_into(keys, &mut cache).await;
        cache
    }

    /// 增量解析：只拉取缓存中还没有的作者
    pub async fn resolve_missing(&self, records: &[ContentRecord], cache: &mut AuthorCache) {
        let keys: Vec<&str> = unique_author_keys(records)
            .into_iter()
            .filter(|key| !cache.contains(key))
            .collect();
        self.fetch_into(keys, cache).await;
    }

    async fn fetch_into(&self, keys: Vec<&str>, cache: &mut AuthorCache) {
        if keys.is_empty() {
            cache.mark_ready();
            return;
        }

        debug!("Resolving {} distinct authors", keys.len());

        let fetches = keys.iter().map(|&key| async move {
            let result = self.api.fetch_author(key).await;
            (key, result)
        });

        let mut failed = 0usize;
        for (key, result) in join_all(fetches).await {
            match result {
                Ok(author) => cache.insert(key, author),
                Err(e) => {
                    failed += 1;
                    warn!("Error fetching author for userId {}: {}", key, e);
                }
            }
        }

        cache.mark_ready();
        info!(
            "Author resolution finished: {} resolved, {} failed",
            keys.len() - failed,
            failed
        );
    }
}

/// 按首次出现顺序去重，跳过空键
pub fn unique_author_keys(records: &[ContentRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| record.author_key.as_str())
        .filter(|key| !key.trim().is_empty())
        .filter(|key| seen.insert(*key))
        .collect()
}
