//! HTTP server for reading and writing posts

mod error;
pub mod pages;

pub use error::ApiError;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentRenderer, PostDraft};
use crate::store::{PostStore, StoreResult};
use crate::Blog;

/// How long shutdown waits for lingering connections to release the store
const STORE_RELEASE_GRACE: Duration = Duration::from_secs(5);

/// Shared state handed to every handler
pub struct AppState {
    config: SiteConfig,
    store: Arc<PostStore>,
    renderer: ContentRenderer,
}

impl AppState {
    pub fn new(config: SiteConfig, store: Arc<PostStore>) -> Self {
        Self {
            config,
            store,
            renderer: ContentRenderer::new(),
        }
    }
}

/// Build the router with all blog routes
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_body_bytes;
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/", get(home_handler).post(create_post_handler))
        .route("/create", get(create_page_handler))
        .route(
            "/:slug",
            get(get_post_handler)
                .post(modify_post_handler)
                .delete(delete_post_handler),
        )
        .route("/:slug/edit", get(edit_page_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server and block until Ctrl+C
///
/// The store is opened before binding and closed after the last in-flight
/// request has finished.
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let store = Arc::new(blog.open_store()?);
    tracing::info!("DB setup done: {}", store.path().display());
    let state = Arc::new(AppState::new(blog.config.clone(), Arc::clone(&store)));
    let app = router(Arc::clone(&state));

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting up..");
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down..");
    drop(state);
    if !release_store(store, STORE_RELEASE_GRACE).await {
        tracing::warn!("Post store still referenced at shutdown, dropping handle");
    }

    Ok(())
}

/// Close the store once every other handle to it is gone
///
/// Connection tasks can outlive `serve` by a moment, so this waits up to
/// `grace` for their clones to drop. Returns whether the store was closed.
async fn release_store(mut store: Arc<PostStore>, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        match Arc::try_unwrap(store) {
            Ok(inner) => {
                inner.close();
                return true;
            }
            Err(shared) => {
                if tokio::time::Instant::now() >= deadline {
                    return false;
                }
                store = shared;
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        }
    }
}

/// Run a store operation on the blocking pool
///
/// redb transactions do file I/O and a writer waits for the one before it,
/// so none of that may run on an async worker.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&PostStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store)).await?;
    Ok(result?)
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// List every post
async fn home_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let posts = with_store(&state, |store| store.list()).await?;
    tracing::info!("Requested the home page.");
    Ok(Html(pages::home(&state.config, &posts)))
}

/// Form for writing a new post
async fn create_page_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::info!("Requested the create post page.");
    Html(pages::create_form(&state.config))
}

/// Show one post with its body rendered and sanitized
async fn get_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, ApiError> {
    let key = slug.clone();
    let post = with_store(&state, move |store| store.get(&key)).await?;
    tracing::info!("Requested: {} by {}", post.title, post.author);

    let body_html = state.renderer.render(&post.body);
    Ok(Html(pages::post(&state.config, &slug, &post, &body_html)))
}

/// Form for editing an existing post
async fn edit_page_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, ApiError> {
    let key = slug.clone();
    let post = with_store(&state, move |store| store.get(&key)).await?;
    tracing::info!("Requested edit page for: {} by {}", post.title, post.author);
    Ok(Html(pages::edit_form(&state.config, &slug, &post)))
}

/// Store a new post from a JSON body, deriving its slug from the title
async fn create_post_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let draft: PostDraft = serde_json::from_slice(&body)?;
    let now = chrono::Utc::now();
    let post = with_store(&state, move |store| store.create(draft, now)).await?;
    tracing::info!("Created post {}", post.slug);
    Ok((StatusCode::CREATED, Json(post)))
}

/// Replace the post at the URL slug; the slug itself never changes
async fn modify_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let draft: PostDraft = serde_json::from_slice(&body)?;
    let now = chrono::Utc::now();
    let post = with_store(&state, move |store| store.update(&slug, draft, now)).await?;
    tracing::info!("Updated post {}", post.slug);
    Ok((StatusCode::CREATED, Json(post)))
}

/// Delete the post at the URL slug; succeeds even if it is already gone
async fn delete_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let key = slug.clone();
    with_store(&state, move |store| store.delete(&key)).await?;
    tracing::info!("Deleted post {}", slug);
    Ok(Json(json!({ "deleted": true })))
}
