//! HTTP surface: upload documents, ask questions over them.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use corpus_model::OpenAiChatModel;
use corpus_rag::{
    AnswerEngine, Document, METADATA_FILENAME, OpenAiEmbeddingProvider, OpenSearchVectorStore,
    RagConfig, RagPipeline, SentenceChunker,
};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::storage::{FsObjectStore, ObjectStore};

/// Largest accepted upload: 32 MiB.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval + answering over the configured collection.
    pub engine: Arc<AnswerEngine>,
    /// Archive for raw uploads.
    pub objects: Arc<dyn ObjectStore>,
    /// The collection (index) documents are ingested into and asked from.
    pub collection: String,
}

impl AppState {
    /// Wire up providers, store, model, and engine from server settings.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let provider = OpenAiEmbeddingProvider::new(&config.openai_api_key)?;

        let mut store = OpenSearchVectorStore::new(&config.opensearch_url);
        if let Some((username, password)) = &config.opensearch_credentials {
            store = store.with_basic_auth(username, password);
        }

        let rag_config = RagConfig::default();
        let chunker = SentenceChunker::new(rag_config.max_words);
        let pipeline = Arc::new(
            RagPipeline::builder()
                .config(rag_config)
                .embedding_provider(Arc::new(provider))
                .vector_store(Arc::new(store))
                .chunker(Arc::new(chunker))
                .build()?,
        );

        let mut model = OpenAiChatModel::new(&config.openai_api_key)?;
        if let Some(chat_model) = &config.chat_model {
            model = model.with_model(chat_model);
        }

        Ok(Self {
            engine: Arc::new(AnswerEngine::new(pipeline, Arc::new(model))),
            objects: Arc::new(FsObjectStore::new(&config.storage_root)),
            collection: config.index.clone(),
        })
    }
}

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/ask", post(ask))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown.
pub async fn run_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for corpus-server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("corpus-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Request/response payloads ──────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub sha: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<String>,
}

// ── Handlers ───────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "corpus-server" }))
}

/// POST /upload — archive the file, extract its text, index the chunks.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_part: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
            file_part = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let Some((filename, bytes)) = file_part else {
        return Err(AppError::BadRequest("No file provided".to_string()));
    };

    let sha = format!("{:x}", Sha256::digest(&bytes));
    let key = format!("uploads/{filename}");
    state.objects.put(&key, &bytes).await?;

    // Extraction is CPU-bound (PDF/workbook parsing); keep it off the runtime.
    let text = tokio::task::spawn_blocking({
        let bytes = bytes.clone();
        let filename = filename.clone();
        move || corpus_extract::extract_text(&bytes, &filename)
    })
    .await
    .map_err(|e| AppError::Internal(format!("extraction task failed: {e}")))??;

    let document = Document {
        id: sha.clone(),
        text,
        metadata: HashMap::from([(METADATA_FILENAME.to_string(), filename.clone())]),
        source_uri: Some(key),
    };

    let chunks = state.engine.pipeline().ingest(&state.collection, &document).await?;
    info!(sha = %sha, filename = %filename, chunk_count = chunks.len(), "upload indexed");

    Ok(Json(UploadResponse {
        message: "File indexed successfully".to_string(),
        sha,
        filename,
    }))
}

/// POST /ask — retrieve context for the question and generate an answer.
async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let question = request
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No question provided".to_string()))?;

    let answer = state.engine.ask(&state.collection, &question).await?;

    Ok(Json(AskResponse { answer: answer.answer, sources: answer.sources }))
}
