use super::{
    AppState, cancel_scan, capture_scan_step, capture_snapshot, describe_design, download_result,
    embedded_assets::WebAssets, extract_design, finish_scan, get_preview, get_scan, get_session,
    get_system_info, health, recreate_design, reset_session, start_scan, upload_images,
};
use crate::config::AppConfig;
use crate::infrastructure::remote::GeminiDesignService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub async fn create_server(config: &AppConfig) -> anyhow::Result<()> {
    info!("Starting Brand Extractor web server...");

    // Parse socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create shared application state
    let service = Arc::new(GeminiDesignService::new(&config.remote)?);
    let app_state = Arc::new(AppState::new(service));

    let app = build_router(app_state.clone(), config.server.body_limit);

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await?;

    println!("🌐 Web server started successfully!");
    println!("   URL: http://{addr}");
    println!("   Press Ctrl+C to stop");

    // Run the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    // 終了時にスキャン中のカメラとプレビューを解放
    if let Some(mut session) = app_state.scanner.lock().await.take() {
        session.cancel();
    }
    app_state.workflow.reset().await;
    info!("Web server stopped");

    Ok(())
}

/// Create the application router with all endpoints
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        // API endpoints
        .route("/api/health", get(health))
        .route("/api/system/info", get(get_system_info))
        // Session endpoints
        .route("/api/session", get(get_session))
        .route("/api/session/images", post(upload_images))
        .route("/api/session/describe", post(describe_design))
        .route("/api/session/recreate", post(recreate_design))
        .route("/api/session/extract", post(extract_design))
        .route("/api/session/reset", post(reset_session))
        .route("/api/session/result", get(download_result))
        .route("/api/previews/{id}", get(get_preview))
        // Capture endpoints
        .route("/api/capture/snapshot", post(capture_snapshot))
        .route("/api/scan", get(get_scan))
        .route("/api/scan/start", post(start_scan))
        .route("/api/scan/capture", post(capture_scan_step))
        .route("/api/scan/finish", post(finish_scan))
        .route("/api/scan/cancel", post(cancel_scan))
        // Add state
        .with_state(state)
        // Add tracing, CORS support and body size limit
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(CorsLayer::permissive()),
        )
        // Serve embedded static files as fallback
        .fallback(static_handler)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// 埋め込まれた静的ファイルを提供するハンドラ
async fn static_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    // ルートパスの場合はindex.htmlを提供
    let path = if path.is_empty() { "index.html" } else { path };

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        // ファイルが見つからない場合はindex.htmlを返す（SPAのため）
        None => match WebAssets::get("index.html") {
            Some(content) => (
                [(header::CONTENT_TYPE, "text/html".to_string())],
                content.data.into_owned(),
            )
                .into_response(),
            None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
        },
    }
}
