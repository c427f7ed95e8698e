use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_service::Service;
use worker::*;

pub mod align;
pub mod anonymizer;
pub mod config;
pub mod detect;
pub mod error;
pub mod mapping;
pub mod models;
pub mod normalize;
pub mod replace;
pub mod spans;
pub mod transliterate;

pub use anonymizer::Anonymizer;
pub use config::AnonymizerConfig;
pub use detect::PatternSet;
pub use error::{AnonymizationError, BoxError, ConfigError};
pub use models::{AnonymizationResult, Artifact, EntityType};
pub use transliterate::{BuiltinTransliterator, Transliterate};

// Input model for API
#[derive(Debug, Deserialize)]
pub struct AnonymizeRequest {
    pub text: String,
    #[serde(default)]
    pub sensitive_words: Vec<String>,
    /// Optional subset of pattern rules for this request.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub anonymizer: Anonymizer,
    pub max_input_chars: Option<usize>,
}

impl AppState {
    pub fn from_config(config: &AnonymizerConfig) -> Self {
        Self {
            anonymizer: Anonymizer::from_config(config),
            max_input_chars: config.max_input_chars,
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/anonymize", post(process_anonymize))
        .with_state(state)
}

#[event(fetch)]
async fn fetch(
    req: HttpRequest,
    env: Env,
    _ctx: Context,
) -> Result<axum::http::Response<axum::body::Body>> {
    console_error_panic_hook::set_once();

    let config = AnonymizerConfig::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()))
        .map_err(|e| Error::RustError(e.to_string()))?;

    Ok(router(AppState::from_config(&config)).call(req).await?)
}

pub async fn root() -> &'static str {
    "Hello from the anonymizer!"
}

pub async fn process_anonymize(
    State(state): State<AppState>,
    Json(request): Json<AnonymizeRequest>,
) -> Response {
    if let Some(limit) = state.max_input_chars {
        let chars = request.text.chars().count();
        if chars > limit {
            console_log!("Rejecting input of {} chars (limit {})", chars, limit);
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Input has {} characters, limit is {}", chars, limit),
            );
        }
    }

    let anonymizer = match &request.fields {
        Some(fields) => state.anonymizer.clone().with_patterns(requested_patterns(fields)),
        None => state.anonymizer,
    };

    match anonymizer.anonymize(&request.text, &request.sensitive_words) {
        Ok(result) => {
            // engine tracing has no subscriber inside the worker
            console_log!("Anonymized: {} PII entities replaced", result.artifacts.len());
            Json(result).into_response()
        }
        Err(e) => {
            // Log the actual error for debugging
            console_log!("Error anonymizing text: {:?}", e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// Pattern rules named in a request. Unknown names and `PERSON` are logged and
/// skipped; the remaining rules still run.
pub fn requested_patterns(fields: &[String]) -> PatternSet {
    let mut enabled = Vec::new();
    for field in fields {
        match EntityType::try_from_str(field) {
            Ok(kind) if kind.is_pattern() => enabled.push(kind),
            Ok(kind) => log_skipped_field(&format!("{} is not a pattern rule", kind)),
            Err(e) => log_skipped_field(&e.to_string()),
        }
    }
    PatternSet::from_types(&enabled)
}

#[cfg(target_arch = "wasm32")]
fn log_skipped_field(reason: &str) {
    console_log!("Warning: {}", reason);
}

#[cfg(not(target_arch = "wasm32"))]
fn log_skipped_field(reason: &str) {
    tracing::warn!("Skipping requested field: {}", reason);
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
