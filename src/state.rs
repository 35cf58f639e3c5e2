/// 会话快照
/// 由外部登录组件提供，构造视图时注入，视图生命周期内不可变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// 空白令牌视为未登录
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// 视图上下文
/// 包含会话和视口信息，替代全局 cookie / resize 监听
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// 会话快照
    pub session: Session,

    /// 视口宽度（像素）
    pub viewport_width: u32,

    /// 移动端断点
    pub mobile_breakpoint: u32,
}

impl ViewContext {
    pub fn new(session: Session, viewport_width: u32) -> Self {
        Self {
            session,
            viewport_width,
            mobile_breakpoint: 768,
        }
    }

    pub fn with_breakpoint(mut self, breakpoint: u32) -> Self {
        self.mobile_breakpoint = breakpoint;
        self
    }

    /// 视口变化时生成新的上下文，会话保持不变
    pub fn resized(&self, viewport_width: u32) -> Self {
        Self {
            viewport_width,
            ..self.clone()
        }
    }

    /// 检查是否为移动端布局
    pub fn is_mobile(&self) -> bool {
        self.viewport_width < self.mobile_breakpoint
    }
}
