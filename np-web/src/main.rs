//! Servidor web Axum para extração de sintagmas nominais em texto bruto
//!
//! Variáveis de ambiente:
//!
//! - `NP_ADDR`: endereço de escuta (padrão `0.0.0.0:3000`)
//! - `NP_MODEL`: caminho do modelo (padrão `np.model`; treinado com o corpus
//!   de demonstração se não existir)
//! - `NP_CONFIG`: JSON opcional com a [`FinderConfig`]
//! - `NP_LEXICON`: léxico JSON opcional (padrão: léxico de demonstração)
//! - `RUST_LOG`: filtro de logs (padrão `info`)

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use np_core::{
    corpus::{demo_corpus, demo_lexicon, demo_texts},
    pipeline::insert_brackets,
    sentence::zip_tagged,
    span::decode_text_spans,
    CrfModel, FinderConfig, LexiconAnalyzer, NpError, NpFinder, StandardTokenizer, TaggedToken,
    TextNpFinder,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Finder = TextNpFinder<StandardTokenizer, LexiconAnalyzer, CrfModel>;

/// Estado compartilhado da aplicação (somente leitura)
struct AppState {
    config: FinderConfig,
    finder: Finder,
}

/// Configuração lida do ambiente
struct ServerSettings {
    addr: String,
    model_path: PathBuf,
    config_path: Option<PathBuf>,
    lexicon_path: Option<PathBuf>,
}

impl ServerSettings {
    fn from_env() -> Self {
        Self {
            addr: std::env::var("NP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            model_path: std::env::var("NP_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("np.model")),
            config_path: std::env::var("NP_CONFIG").ok().map(PathBuf::from),
            lexicon_path: std::env::var("NP_LEXICON").ok().map(PathBuf::from),
        }
    }
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Serialize)]
struct ChunkResponse {
    nps: Vec<String>,
    bracketed: String,
    tagged_tokens: Vec<TaggedToken>,
    total_tokens: usize,
    processing_ms: u64,
}

#[derive(Serialize)]
struct TokenFeatures {
    word: String,
    postag: Option<String>,
    features: Vec<String>,
}

/// Erros da API, convertidos em respostas JSON
enum ApiError {
    BadRequest(String),
    Core(NpError),
    Internal(String),
}

impl From<NpError> for ApiError {
    fn from(err: NpError) -> Self {
        ApiError::Core(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(err @ (NpError::Validation(_) | NpError::SpanAlignment { .. })) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Core(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status.is_server_error() {
            warn!(%status, error = %message, "request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn load_config(settings: &ServerSettings) -> np_core::Result<FinderConfig> {
    match &settings.config_path {
        Some(path) => FinderConfig::from_json_file(path),
        None => Ok(FinderConfig::default()),
    }
}

/// Carrega (ou treina, na primeira execução) o modelo e monta o finder
fn build_finder(settings: &ServerSettings, config: &FinderConfig) -> np_core::Result<Finder> {
    if !settings.model_path.exists() {
        info!(path = %settings.model_path.display(), "model not found, training on demo corpus");
        NpFinder::train(config, &demo_corpus(), &settings.model_path)?;
    }
    let model = CrfModel::load_for(&settings.model_path, &config.features, config.variant)?;

    let lexicon = match &settings.lexicon_path {
        Some(path) => LexiconAnalyzer::from_json_file(path)?,
        None => demo_lexicon(),
    };
    info!(words = lexicon.len(), "lexicon loaded");

    Ok(TextNpFinder::new(config, StandardTokenizer, lexicon, model))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = ServerSettings::from_env();
    let config = load_config(&settings)?;

    let (settings, config, finder) = tokio::task::spawn_blocking(move || {
        let finder = build_finder(&settings, &config);
        (settings, config, finder)
    })
    .await?;
    let state = Arc::new(AppState {
        config,
        finder: finder?,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/chunk", post(chunk_handler))
        .route("/features", post(features_handler))
        .route("/config", get(config_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;
    info!("Servidor NP iniciado em http://{}", settings.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

fn require_text(req: TextRequest) -> Result<String, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Texto vazio".to_string()));
    }
    Ok(req.text)
}

/// Sintagmas, texto com colchetes e tags por token
async fn chunk_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let text = require_text(req)?;

    let response = tokio::task::spawn_blocking(move || -> Result<ChunkResponse, ApiError> {
        let start = Instant::now();
        let sent = state.finder.analyze_sent(&text);
        let tags = state.finder.finder().get_tags(&sent)?;
        let tagged_tokens = zip_tagged(&sent, &tags)?;
        let nps = decode_text_spans(&tagged_tokens, state.config.decode)?;
        let bracketed = insert_brackets(&text, &nps)?;

        Ok(ChunkResponse {
            nps,
            bracketed,
            total_tokens: tagged_tokens.len(),
            tagged_tokens,
            processing_ms: start.elapsed().as_millis() as u64,
        })
    })
    .await??;

    Ok(Json(response))
}

/// Features geradas para cada palavra mantida pela análise
async fn features_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Vec<TokenFeatures>>, ApiError> {
    let text = require_text(req)?;

    let rows = tokio::task::spawn_blocking(move || -> Result<Vec<TokenFeatures>, ApiError> {
        let sent = state.finder.analyze_sent(&text);
        let vectors = state.finder.finder().sent2features(&sent)?;
        Ok(sent
            .into_iter()
            .zip(vectors)
            .map(|(token, fv)| TokenFeatures {
                word: token.word,
                postag: token.postag,
                features: fv.features,
            })
            .collect())
    })
    .await??;

    Ok(Json(rows))
}

async fn config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.clone())
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    Json(demo_texts())
}
