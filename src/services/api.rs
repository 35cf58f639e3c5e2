use crate::{
    config::Config,
    error::{ClientError, Result},
    models::{
        author::Author,
        content::{ContentRecord, ContentUpdate},
        response::{
            AckPayload, ApiResponse, AuthorPayload, BookmarkPayload, ContentListPayload,
            ContentPayload, SessionUser, SessionUserPayload,
        },
    },
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

/// 远程博客 API 边界
/// 视图和协调器只依赖该 trait，测试时替换为内存实现
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn fetch_author(&self, author_key: &str) -> Result<Author>;

    async fn fetch_content_list(&self) -> Result<Vec<ContentRecord>>;

    async fn fetch_content(&self, content_id: &str) -> Result<ContentRecord>;

    /// 服务端决定翻转后的书签状态
    async fn toggle_bookmark(&self, content_id: &str, token: &str) -> Result<bool>;

    async fn fetch_session_user(&self, token: &str) -> Result<SessionUser>;

    async fn delete_content(&self, content_id: &str, token: &str) -> Result<()>;

    /// 返回服务端保存后的文章
    async fn update_content(
        &self,
        content_id: &str,
        changes: &ContentUpdate,
        token: &str,
    ) -> Result<ContentRecord>;
}

pub type SharedApi = Arc<dyn BlogApi>;

#[derive(Clone)]
pub struct HttpBlogApi {
    http_client: Client,
    base_url: Url,
}

impl HttpBlogApi {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(http_client, &config.api_url)
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::config("API_URL cannot be used as a base URL"));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// 拼接路径段，每段单独做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::config("API_URL cannot be used as a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            ClientError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned error status: {}", endpoint, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed: ApiResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to parse response from {}: {}", endpoint, e);
            ClientError::Serialization(e)
        })?;

        parsed.into_result()
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn fetch_author(&self, author_key: &str) -> Result<Author> {
        debug!("Fetching author: {}", author_key);

        let url = self.endpoint(&["authors", author_key])?;
        let payload: AuthorPayload = self
            .send(self.request(Method::GET, url, None), "GET /authors/{key}")
            .await?;

        payload
            .author
            .ok_or_else(|| ClientError::api("Response did not include an author"))
    }

    async fn fetch_content_list(&self) -> Result<Vec<ContentRecord>> {
        debug!("Fetching content list");

        let url = self.endpoint(&["content"])?;
        let payload: ContentListPayload = self
            .send(self.request(Method::GET, url, None), "GET /content")
            .await?;

        Ok(payload.items)
    }

    async fn fetch_content(&self, content_id: &str) -> Result<ContentRecord> {
        debug!("Fetching content: {}", content_id);

        let url = self.endpoint(&["content", content_id])?;
        let payload: ContentPayload = self
            .send(self.request(Method::GET, url, None), "GET /content/{id}")
            .await?;

        payload
            .item
            .ok_or_else(|| ClientError::api("Response did not include a content item"))
    }

    async fn toggle_bookmark(&self, content_id: &str, token: &str) -> Result<bool> {
        debug!("Toggling bookmark for content: {}", content_id);

        let url = self.endpoint(&["content", content_id, "bookmark"])?;
        let payload: BookmarkPayload = self
            .send(
                self.request(Method::PUT, url, Some(token)),
                "PUT /content/{id}/bookmark",
            )
            .await?;

        payload
            .bookmarked
            .ok_or_else(|| ClientError::api("Response did not include the bookmark state"))
    }

    async fn fetch_session_user(&self, token: &str) -> Result<SessionUser> {
        debug!("Fetching session user");

        let url = self.endpoint(&["session", "user"])?;
        let payload: SessionUserPayload = self
            .send(self.request(Method::GET, url, Some(token)), "GET /session/user")
            .await?;

        payload
            .user
            .ok_or_else(|| ClientError::api("Response did not include a user"))
    }

    async fn delete_content(&self, content_id: &str, token: &str) -> Result<()> {
        debug!("Deleting content: {}", content_id);

        let url = self.endpoint(&["content", content_id])?;
        let _: AckPayload = self
            .send(self.request(Method::DELETE, url, Some(token)), "DELETE /content/{id}")
            .await?;

        Ok(())
    }

    async fn update_content(
        &self,
        content_id: &str,
        changes: &ContentUpdate,
        token: &str,
    ) -> Result<ContentRecord> {
        debug!("Updating content: {}", content_id);

        let url = self.endpoint(&["content", content_id])?;
        let payload: ContentPayload = self
            .send(
                self.request(Method::PUT, url, Some(token)).json(changes),
                "PUT /content/{id}",
            )
            .await?;

        payload
            .item
            .ok_or_else(|| ClientError::api("Response did not include the updated content item"))
    }
}
