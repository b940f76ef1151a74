use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Html,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

use crate::api;
use crate::artifact::{ArtifactKind, Upload};
use crate::config::DashboardConfig;
use crate::dashboard::{DashboardInput, build_view};
use crate::view;

pub type SharedConfig = Arc<DashboardConfig>;

/// Build the application router
pub fn router(config: SharedConfig) -> Router {
    let body_limit = config.server.max_upload_bytes();
    let timeout = Duration::from_secs(config.server.request_timeout_seconds.into());

    Router::new()
        .route("/", get(show_dashboard).post(submit_dashboard))
        .route("/healthz", get(|| async { "ok" }))
        .nest("/api", api::router())
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeout,
                )),
        )
        .with_state(config)
}

pub async fn run(config: DashboardConfig) -> Result<()> {
    let config = Arc::new(config);
    let addr = config.server.bind_address();
    let app = router(config.clone());

    if let (Some(cert), Some(key)) = (&config.server.tls_cert_path, &config.server.tls_key_path) {
        return serve_tls(app, &addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Dashboard running at http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("Dashboard server failed")
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: Router,
    addr: &str,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS certificate {}", cert.display()))?;
    let addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid bind address {addr}"))?;
    info!("Dashboard running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .context("Dashboard server failed")
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _app: Router,
    _addr: &str,
    _cert: &std::path::Path,
    _key: &std::path::Path,
) -> Result<()> {
    Err(crate::TripDeckError::config(
        "TLS certificate configured but tripdeck was built without the `tls` feature",
    )
    .into())
}

#[instrument(skip_all)]
async fn show_dashboard(State(config): State<SharedConfig>) -> Html<String> {
    let input = DashboardInput::new(config.defaults.trip_parameters());
    let view = build_view(&input, &config.report);
    Html(view::page(&view).into_string())
}

#[instrument(skip_all)]
async fn submit_dashboard(
    State(config): State<SharedConfig>,
    mut multipart: Multipart,
) -> Result<Html<String>, MultipartError> {
    let mut input = DashboardInput::new(config.defaults.trip_parameters());

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if let Some(kind) = ArtifactKind::from_form_field(&name) {
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            debug!(artifact = kind.label(), size = bytes.len(), "Received upload");
            input.set_upload(kind, Upload::new(file_name, bytes.to_vec()));
            continue;
        }

        let text = field.text().await?;
        let params = &mut input.params;
        match name.as_str() {
            "country" => params.country = text,
            "city" => params.city = text,
            "budget" => params.budget = text,
            "trip_type" => params.trip_type = text,
            "duration" => params.duration = text,
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let view = build_view(&input, &config.report);
    Ok(Html(view::page(&view).into_string()))
}
