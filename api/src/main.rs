mod config;

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use config::Config;
use quran_reader_lib::{
    annotate_verse, legend, AnnotatedVerse, Chapter, ChapterDetail, ContentStore, LegendEntry,
    QuranError, SectionInfo, Verse, VerseDetail,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppState {
    store: ContentStore,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    chapters: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error_response(err: QuranError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        QuranError::NotFound(_) => StatusCode::NOT_FOUND,
        QuranError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::debug!("Request rejected: {}", err);
    }
    (status, Json(ErrorResponse { error: err.to_string() }))
}

/// `Path` whose rejection carries the same JSON error body as every other failure.
struct ApiPath<T>(T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => {
                tracing::debug!("Rejected path {}: {}", parts.uri.path(), rejection.body_text());
                Err((
                    rejection.status(),
                    Json(ErrorResponse { error: rejection.body_text() }),
                ))
            }
        }
    }
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let chapters = state.store.chapter_list().map(|c| c.len()).unwrap_or(0);
    Json(HealthResponse {
        status: "ok".to_string(),
        chapters,
    })
}

async fn list_chapters(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Chapter>> {
    state.store.chapter_list().map(Json).map_err(error_response)
}

async fn get_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(no_surat): ApiPath<u32>,
) -> ApiResult<ChapterDetail> {
    state.store.chapter(no_surat).map(Json).map_err(error_response)
}

async fn get_verse(
    State(state): State<Arc<AppState>>,
    ApiPath((no_surat, no_ayat)): ApiPath<(u32, u32)>,
) -> ApiResult<VerseDetail> {
    state.store.verse(no_surat, no_ayat).map(Json).map_err(error_response)
}

async fn get_verse_tajwid(
    State(state): State<Arc<AppState>>,
    ApiPath((no_surat, no_ayat)): ApiPath<(u32, u32)>,
) -> ApiResult<AnnotatedVerse> {
    let detail = state.store.verse(no_surat, no_ayat).map_err(error_response)?;
    Ok(Json(annotate_verse(&detail.verse, None)))
}

async fn list_sections(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SectionInfo>> {
    state.store.section_list().map(Json).map_err(error_response)
}

async fn get_section(
    State(state): State<Arc<AppState>>,
    ApiPath(no_juz): ApiPath<u32>,
) -> ApiResult<Vec<Verse>> {
    state.store.section(no_juz).map(Json).map_err(error_response)
}

async fn search(
    State(state): State<Arc<AppState>>,
    ApiPath(query): ApiPath<String>,
) -> ApiResult<Vec<Verse>> {
    let results = state.store.search(&query).map_err(error_response)?;
    tracing::debug!("Search {:?}: {} verses", query, results.len());
    Ok(Json(results))
}

async fn tajwid_legend() -> Json<Vec<LegendEntry>> {
    Json(legend())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/surat", get(list_chapters))
        .route("/api/surat/:no_surat", get(get_chapter))
        .route("/api/surat/:no_surat/:no_ayat", get(get_verse))
        .route("/api/surat/:no_surat/:no_ayat/tajwid", get(get_verse_tajwid))
        .route("/api/juz", get(list_sections))
        .route("/api/juz/:no_juz", get(get_section))
        .route("/api/search/:query", get(search))
        .route("/api/tajwid/legend", get(tajwid_legend))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quran_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store = ContentStore::open(&config.database.path)
        .with_context(|| format!("Failed to open content database {:?}", config.database.path))?;
    tracing::info!("Content database: {:?}", config.database.path);

    let state = Arc::new(AppState { store });

    let mut app = router(state).layer(TraceLayer::new_for_http());
    if config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
