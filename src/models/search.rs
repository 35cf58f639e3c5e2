use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 搜索字段范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Title,
    Author,
    Content,
    Tags,
    Date,
}

impl SearchScope {
    pub const ALL_SCOPES: [SearchScope; 6] = [
        SearchScope::All,
        SearchScope::Title,
        SearchScope::Author,
        SearchScope::Content,
        SearchScope::Tags,
        SearchScope::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Title => "title",
            SearchScope::Author => "author",
            SearchScope::Content => "content",
            SearchScope::Tags => "tags",
            SearchScope::Date => "date",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScope(pub String);

impl fmt::Display for UnknownScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search scope: {}", self.0)
    }
}

impl std::error::Error for UnknownScope {}

impl FromStr for SearchScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL_SCOPES
            .iter()
            .copied()
            .find(|scope| scope.as_str() == normalized)
            .ok_or(UnknownScope(s.to_string()))
    }
}

/// 临时搜索条件，不持久化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    #[serde(default)]
    pub scope: SearchScope,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            text: text.into(),
            scope,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// 去空白并转小写后的匹配串；空查询返回 None
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// 清空查询并恢复默认范围
    pub fn clear(&mut self) {
        self.text.clear();
        self.scope = SearchScope::All;
    }
}
