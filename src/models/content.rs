use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::count_or_list;

/// 一篇博客文章的客户端只读投影
/// 书签标记属于当前查看用户，不是文章本身的属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "content", default)]
    pub body: String,

    /// 逗号连接的原始标签文本
    #[serde(rename = "tags", default)]
    pub tag_text: String,

    #[serde(rename = "userId", default)]
    pub author_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "createdAt", default = "epoch")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "isBookMark", default)]
    pub bookmarked: bool,

    #[serde(default, deserialize_with = "count_or_list::deserialize")]
    pub likes: u64,

    #[serde(default, deserialize_with = "count_or_list::deserialize")]
    pub comments: u64,

    #[serde(default, deserialize_with = "count_or_list::deserialize")]
    pub views: u64,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl ContentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            tag_text: String::new(),
            author_key: String::new(),
            image: None,
            created_at: epoch(),
            bookmarked: false,
            likes: 0,
            comments: 0,
            views: 0,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tag_text = tags.into();
        self
    }

    pub fn with_author(mut self, author_key: impl Into<String>) -> Self {
        self.author_key = author_key.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_bookmarked(mut self, bookmarked: bool) -> Self {
        self.bookmarked = bookmarked;
        self
    }

    /// 解析标签：按逗号拆分、去除空白、丢弃空项
    pub fn tags(&self) -> Vec<&str> {
        self.tag_text
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// 卡片上显示的前 `limit` 个标签及剩余数量
    pub fn tag_preview(&self, limit: usize) -> (Vec<&str>, usize) {
        let tags = self.tags();
        let hidden = tags.len().saturating_sub(limit);
        (tags.into_iter().take(limit).collect(), hidden)
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().map_or(false, |uri| !uri.trim().is_empty())
    }
}

/// 编辑文章的请求体；`None` 字段不发送，服务端保持原值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "content", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(rename = "tags", default, skip_serializing_if = "Option::is_none")]
    pub tag_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContentUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.tag_text.is_none() && self.image.is_none()
    }

    /// 把修改应用到一份本地副本
    pub fn apply_to(&self, record: &mut ContentRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(body) = &self.body {
            record.body = body.clone();
        }
        if let Some(tags) = &self.tag_text {
            record.tag_text = tags.clone();
        }
        if let Some(image) = &self.image {
            record.image = Some(image.clone());
        }
    }
}
