use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::models::{author::Author, content::ContentRecord};

/// 标准API响应格式
/// 业务字段因端点而异，通过 flatten 展开到同一层级
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// `success: false` 转为 `ClientError::Api`
    pub fn into_result(self) -> Result<T> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ClientError::Api(
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthorPayload {
    #[serde(default)]
    pub author: Option<Author>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentListPayload {
    #[serde(default, alias = "blogs")]
    pub items: Vec<ContentRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentPayload {
    #[serde(default, alias = "blog")]
    pub item: Option<ContentRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BookmarkPayload {
    #[serde(default, alias = "isBookmarked")]
    pub bookmarked: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionUserPayload {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// 当前登录用户（仅书签相关字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub bookmarks: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AckPayload {}
