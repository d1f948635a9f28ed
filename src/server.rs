//! JSON HTTP API server.
//!
//! Exposes document upload/listing/deletion, FAQ generation, and
//! collection management as a JSON API for the web front-end.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/faqs` | Generate FAQs from uploaded documents into a collection |
//! | `POST` | `/api/files` | Upload a document (multipart) |
//! | `GET`  | `/api/files` | List stored documents |
//! | `DELETE` | `/api/files` | Delete a stored document |
//! | `GET`  | `/api/faq_collections` | List collections, newest first |
//! | `POST` | `/api/faq_collections` | Create a collection |
//! | `GET`  | `/api/faq_collections/{id}` | Fetch one collection |
//! | `GET`  | `/api/faq_collections/{id}/faqs` | List a collection's FAQs |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Failures respond with a JSON envelope:
//!
//! ```json
//! { "error": "assistant job failed: ...", "error_details": "..." }
//! ```
//!
//! Status codes are driven by the typed error taxonomy: invalid input is
//! `400`, an unknown collection id on lookup is `404`, and everything
//! else (remote job failure, malformed response, store rejection) is
//! `500`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser
//! front-end can call the API from any host.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::assistant::AssistantClient;
use crate::config::{AssistantConfig, Config};
use crate::db;
use crate::error::GenerateError;
use crate::files::DocumentStoreClient;
use crate::generate::generate_faqs;
use crate::migrate;
use crate::models::{FaqRow, StoredFile};
use crate::store::FaqStore;

/// Request body cap, sized for document uploads.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor. All external-service clients are constructed once
/// at startup and injected here.
#[derive(Clone)]
struct AppState {
    assistant: Arc<AssistantClient>,
    documents: Arc<DocumentStoreClient>,
    store: FaqStore,
    settings: Arc<AssistantConfig>,
}

/// Starts the HTTP API server.
///
/// Connects to the database (applying the schema if needed), constructs
/// the remote-service clients, and binds to the address configured in
/// `[server].bind`. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;

    let state = AppState {
        assistant: Arc::new(AssistantClient::new(&config.assistant)?),
        documents: Arc::new(DocumentStoreClient::new(&config.assistant)?),
        store: FaqStore::new(pool),
        settings: Arc::new(config.assistant.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/faqs", post(handle_generate_faqs))
        .route(
            "/api/files",
            post(handle_upload_file)
                .get(handle_list_files)
                .delete(handle_delete_file),
        )
        .route(
            "/api/faq_collections",
            get(handle_list_collections).post(handle_create_collection),
        )
        .route("/api/faq_collections/{id}", get(handle_get_collection))
        .route(
            "/api/faq_collections/{id}/faqs",
            get(handle_list_collection_faqs),
        )
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state);

    let bind_addr = &config.server.bind;
    tracing::info!(bind = %bind_addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error envelope returned by every failing endpoint.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<String>,
}

/// Internal error type that converts into an Axum HTTP response.
struct ApiError {
    status: StatusCode,
    error: String,
    error_details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.error, "request failed");
        }
        let body = ErrorBody {
            error: self.error,
            error_details: self.error_details,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        error: message.into(),
        error_details: None,
    }
}

fn not_found(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        error: message.into(),
        error_details: None,
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        let status = match err {
            GenerateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            error: err.to_string(),
            error_details: Some(format!("{:?}", err)),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(GenerateError::Persistence(err))
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check used by load balancers and monitoring.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/faqs ============

/// Request body for FAQ generation. Fields default to empty so missing
/// keys surface as a 400 from validation rather than a decode rejection.
#[derive(Deserialize)]
struct GenerateFaqsRequest {
    #[serde(rename = "fileIds", default)]
    file_ids: Vec<String>,
    #[serde(default)]
    faq_collection_id: String,
}

/// Handler for `POST /api/faqs`.
///
/// Runs the full generation pipeline and responds with the stored FAQ
/// rows. The request stays open for the whole assistant job — several
/// seconds to tens of seconds in practice.
async fn handle_generate_faqs(
    State(state): State<AppState>,
    Json(req): Json<GenerateFaqsRequest>,
) -> Result<Json<Vec<FaqRow>>, ApiError> {
    let rows = generate_faqs(
        &state.assistant,
        &state.store,
        &state.settings,
        &req.file_ids,
        &req.faq_collection_id,
    )
    .await?;

    Ok(Json(rows))
}

// ============ POST /api/files ============

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    #[serde(rename = "fileId")]
    file_id: String,
}

/// Handler for `POST /api/files` (multipart upload).
///
/// Forwards the first file field to the hosted document store and
/// responds with the issued file id.
async fn handle_upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(|f| f.to_string()) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(e.to_string()))?;

        let file = state.documents.upload(&filename, bytes.to_vec()).await?;
        tracing::info!(file_id = %file.id, filename = %filename, "document uploaded");

        return Ok(Json(UploadResponse {
            success: true,
            file_id: file.id,
        }));
    }

    Err(bad_request("No valid file provided"))
}

// ============ GET /api/files ============

#[derive(Serialize)]
struct FileListResponse {
    success: bool,
    files: Vec<StoredFile>,
}

/// Handler for `GET /api/files`.
async fn handle_list_files(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.documents.list().await?;
    Ok(Json(FileListResponse {
        success: true,
        files,
    }))
}

// ============ DELETE /api/files ============

#[derive(Deserialize)]
struct DeleteFileRequest {
    #[serde(rename = "fileId", default)]
    file_id: String,
}

#[derive(Serialize)]
struct DeleteFileResponse {
    success: bool,
    message: String,
}

/// Handler for `DELETE /api/files`.
async fn handle_delete_file(
    State(state): State<AppState>,
    Json(req): Json<DeleteFileRequest>,
) -> Result<Json<DeleteFileResponse>, ApiError> {
    if req.file_id.trim().is_empty() {
        return Err(bad_request("No fileId provided"));
    }

    state.documents.delete(&req.file_id).await?;

    Ok(Json(DeleteFileResponse {
        success: true,
        message: format!("File {} deleted successfully", req.file_id),
    }))
}

// ============ Collections ============

#[derive(Deserialize)]
struct CreateCollectionRequest {
    #[serde(default)]
    name: String,
}

/// Handler for `POST /api/faq_collections`.
async fn handle_create_collection(
    State(state): State<AppState>,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<Response, ApiError> {
    if req.name.trim().is_empty() {
        return Err(bad_request("Collection name is required"));
    }

    let collection = state.store.create_collection(&req.name).await?;
    Ok((StatusCode::CREATED, Json(collection)).into_response())
}

/// Handler for `GET /api/faq_collections`.
async fn handle_list_collections(State(state): State<AppState>) -> Result<Response, ApiError> {
    let collections = state.store.list_collections().await?;
    Ok(Json(collections).into_response())
}

/// Handler for `GET /api/faq_collections/{id}`.
async fn handle_get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.store.get_collection(&id).await? {
        Some(collection) => Ok(Json(collection).into_response()),
        None => Err(not_found(format!("FAQ collection not found: {}", id))),
    }
}

/// Handler for `GET /api/faq_collections/{id}/faqs`.
async fn handle_list_collection_faqs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<FaqRow>>, ApiError> {
    let faqs = state.store.faqs_for_collection(&id).await?;
    Ok(Json(faqs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err = ApiError::from(GenerateError::InvalidInput("fileIds".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_pipeline_errors_map_to_500() {
        let errors = vec![
            GenerateError::Api("boom".to_string()),
            GenerateError::JobFailed("boom".to_string()),
            GenerateError::Timeout { attempts: 120 },
            GenerateError::NoAssistantResponse,
            GenerateError::MalformedResponse("boom".to_string()),
        ];

        for err in errors {
            let api = ApiError::from(err);
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(api.error_details.is_some());
        }
    }
}
