use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 作者无法解析时的显示名
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// 内容作者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(rename = "image", alias = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
            bio: None,
        }
    }
}

/// 视图私有的作者缓存
/// 以作者键为索引；解析未完成时 `is_ready()` 为 false
#[derive(Debug, Clone, Default)]
pub struct AuthorCache {
    entries: HashMap<String, Author>,
    ready: bool,
}

impl AuthorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, author_key: &str) -> Option<&Author> {
        self.entries.get(author_key)
    }

    pub fn contains(&self, author_key: &str) -> bool {
        self.entries.contains_key(author_key)
    }

    pub fn insert(&mut self, author_key: impl Into<String>, author: Author) {
        self.entries.insert(author_key.into(), author);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// 显示名；作者未知时返回回退文本
    pub fn display_name<'a>(&'a self, author_key: &str, fallback: &'a str) -> &'a str {
        self.get(author_key)
            .map(|author| author.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ready = false;
    }
}

impl FromIterator<(String, Author)> for AuthorCache {
    fn from_iter<I: IntoIterator<Item = (String, Author)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ready: false,
        }
    }
}
