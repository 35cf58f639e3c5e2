use std::sync::Arc;

use rainbow_blog_client::{
    BookmarkCoordinator, BookmarkSink, Config, ContentListView, DateFormatter, HttpBlogApi,
    LoadState, SearchFilterEngine, SearchScope, Session, ViewContext,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rainbow-Blog client against {}", config.api_url);

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_default();
    let scope: SearchScope = match args.next() {
        Some(raw) => raw.parse()?,
        None => SearchScope::All,
    };
    let bookmark_target = args.next();

    let session = match &config.auth_token {
        Some(token) => Session::authenticated(token.clone()),
        None => Session::anonymous(),
    };
    let context = ViewContext::new(session.clone(), 1280).with_breakpoint(config.mobile_breakpoint);

    let api = Arc::new(HttpBlogApi::new(&config)?);
    let engine = SearchFilterEngine::new(DateFormatter::from_config(&config)?);
    let view = ContentListView::new(context, api.clone(), engine);

    let coordinator = BookmarkCoordinator::new(api, session);
    let mut bookmark_events = coordinator.subscribe();

    match view.load().await {
        LoadState::Ready => {}
        LoadState::Failed(message) => {
            error!("{}", message);
            view.unmount();
            return Err(anyhow::anyhow!(message));
        }
        other => warn!("Unexpected load state: {:?}", other),
    }

    // 第三个参数：切换该文章的书签
    if let Some(record) = bookmark_target.as_deref().and_then(|id| view.record(id)) {
        match coordinator.toggle(&record).await {
            Ok(outcome) => info!("Bookmark toggle for {}: {:?}", record.id, outcome),
            Err(e) => warn!("{}", e.user_message()),
        }
        view.sync_bookmarks(&mut bookmark_events).await;
    }

    view.set_search_text(query.clone());
    view.set_scope(scope);
    let visible = view.visible();

    if !query.trim().is_empty() && visible.is_empty() {
        println!("No blogs found matching \"{}\" in {}.", query, scope);
    } else {
        let noun = if visible.len() == 1 { "blog" } else { "blogs" };
        println!("{} {} found", visible.len(), noun);
    }

    for record in &visible {
        let author = view.author_name(record);
        let (tags, hidden) = record.tag_preview(2);
        let mut tag_line = tags.iter().map(|tag| format!("#{}", tag)).collect::<Vec<_>>().join(" ");
        if hidden > 0 {
            tag_line.push_str(&format!(" +{} more", hidden));
        }
        let marker = if record.bookmarked { "*" } else { " " };

        println!(
            "{} [{}] {} by {} on {} {}",
            marker,
            record.id,
            record.title,
            author,
            view.display_date(record),
            tag_line
        );
    }

    view.unmount();
    Ok(())
}
