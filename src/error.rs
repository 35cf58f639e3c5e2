use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Authentication required: please log in to continue")]
    AuthRequired,

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// 便利函数，用于创建常见错误
impl ClientError {
    pub fn api(msg: &str) -> Self {
        Self::Api(msg.to_string())
    }

    pub fn config(msg: &str) -> Self {
        Self::Config(msg.to_string())
    }

    /// 是否需要提示用户登录
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ClientError::AuthRequired)
            || matches!(self, ClientError::Status { status: 401, .. })
    }

    /// 面向用户的简短提示文本
    pub fn user_message(&self) -> String {
        match self {
            ClientError::AuthRequired => "Please log in to bookmark blogs".to_string(),
            ClientError::Request(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            ClientError::Request(_) | ClientError::Status { .. } => {
                "Could not reach the blog service".to_string()
            }
            ClientError::Api(msg) => msg.clone(),
            ClientError::Serialization(_) => "Received an unexpected response".to_string(),
            ClientError::Url(_) | ClientError::Config(_) | ClientError::Internal(_) => {
                "Something went wrong".to_string()
            }
        }
    }
}
