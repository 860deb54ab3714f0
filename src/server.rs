//! HTTP front end.
//!
//! Retrieval, reporting, and raw store access are read-only and run
//! concurrently. Writes go through the [`IngestQueue`] so there is a single
//! writer no matter how many requests arrive.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use octolog::config::OctologConfig;
use octolog::error::JournalError;
use octolog::journal::queue::{IngestQueue, IngestRequest};
use octolog::journal::timestamp::now_timestamp;
use octolog::journal::Journal;
use serde::Deserialize;
use serde_json::json;

#[derive(Clone)]
struct AppState {
    journal: Arc<Journal>,
    queue: IngestQueue,
}

/// API error carrying the status to reply with.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        let status = match &err {
            e if e.is_bad_input() => StatusCode::BAD_REQUEST,
            e if e.is_provider_failure() => StatusCode::BAD_GATEWAY,
            JournalError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct RetrieveParams {
    query: Option<String>,
    start: Option<String>,
    end: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct IngestBody {
    text: String,
    timestamp: Option<String>,
    image_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ReportParams {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct AskBody {
    question: String,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/data", get(data))
        .route("/entries", get(retrieve).post(ingest))
        .route("/report", get(report))
        .route("/reports/{date}", get(saved_report))
        .route("/ask", post(ask))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// The whole store in its persisted shape.
async fn data(State(state): State<AppState>) -> ApiResult<Response> {
    let store = Arc::clone(state.journal.store());
    let snapshot = tokio::task::spawn_blocking(move || store.all())
        .await
        .map_err(JournalError::from)??;
    Ok(Json(&*snapshot).into_response())
}

async fn retrieve(
    State(state): State<AppState>,
    Query(params): Query<RetrieveParams>,
) -> ApiResult<Response> {
    let limit = params
        .limit
        .unwrap_or(state.journal.settings().default_limit);
    let retrieval = state
        .journal
        .retrieve(
            params.query.as_deref(),
            params.start.as_deref(),
            params.end.as_deref(),
            limit,
        )
        .await?;
    Ok(Json(retrieval).into_response())
}

async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestBody>,
) -> ApiResult<Response> {
    let request = IngestRequest {
        text: body.text,
        timestamp: body.timestamp.unwrap_or_else(now_timestamp),
        image_path: body.image_path,
    };
    let outcome = state.queue.submit(request).await?;
    Ok((StatusCode::CREATED, Json(outcome)).into_response())
}

async fn report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Response> {
    let report = state.journal.generate_report(&params.start, &params.end).await?;
    let saved_to = state.journal.save_report(&report).await?;
    Ok(Json(json!({
        "report": report,
        "saved_to": saved_to.display().to_string(),
    }))
    .into_response())
}

async fn saved_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Response> {
    match state.journal.load_saved_report(&date).await? {
        Some(body) => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            body,
        )
            .into_response()),
        None => Err(ApiError {
            status: StatusCode::NOT_FOUND,
            message: "Report not found".into(),
        }),
    }
}

async fn ask(State(state): State<AppState>, Json(body): Json<AskBody>) -> ApiResult<Response> {
    let answer = state.journal.ask(&body.question).await?;
    Ok(Json(json!({ "answer": answer })).into_response())
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: OctologConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let journal = Arc::new(Journal::from_config(&config)?);
    let (queue, writer) = IngestQueue::spawn(Arc::clone(&journal), config.ingest.queue_capacity);

    let app = router(AppState { journal, queue });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "octolog listening at http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    // Router (and its queue handle) is gone; let the writer drain.
    writer.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octolog::journal::JournalSettings;
    use octolog::providers::Providers;
    use octolog::store::EntryStore;
    use tempfile::TempDir;

    fn status_of(err: JournalError) -> StatusCode {
        ApiError::from(err).status
    }

    #[test]
    fn bad_input_maps_to_400() {
        assert_eq!(
            status_of(JournalError::InvalidTimestamp {
                value: "yesterday".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(JournalError::InvalidLimit(0)), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_failures_map_to_502() {
        assert_eq!(
            status_of(JournalError::RetrievalProvider(anyhow::anyhow!("down"))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(JournalError::ReportGeneration(anyhow::anyhow!("down"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn stopped_writer_maps_to_503() {
        assert_eq!(status_of(JournalError::QueueClosed), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn store_failures_map_to_500() {
        let parse_error = serde_json::from_str::<u8>("not json").unwrap_err();
        assert_eq!(
            status_of(JournalError::CorruptStore {
                path: "db.json".into(),
                source: parse_error,
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(JournalError::Io {
                path: "db.json".into(),
                source: std::io::Error::other("disk full"),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_carries_message() {
        let response = ApiError::from(JournalError::InvalidLimit(0)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[tokio::test]
    async fn missing_saved_report_is_404() {
        let tmp = TempDir::new().unwrap();
        let store = EntryStore::open(tmp.path().join("db.json")).unwrap();
        let settings = JournalSettings {
            report_dir: tmp.path().join("reports"),
            ..JournalSettings::default()
        };
        let journal = Arc::new(Journal::new(Arc::new(store), Providers::none(), settings));
        let (queue, _writer) = IngestQueue::spawn(Arc::clone(&journal), 1);
        let state = AppState { journal, queue };

        let err = saved_report(State(state), Path("2026-02-26".into()))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
