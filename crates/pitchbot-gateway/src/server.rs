use crate::dispatch::Dispatcher;
use crate::event::WebhookEnvelope;
use crate::interpreter::CommandInterpreter;
use crate::signature::verify_signature;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use pitchbot_core::{PitchbotError, PitchbotResult};
use pitchbot_line::LineClient;
use pitchbot_reserve::{AttendanceReconciler, SessionCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

/// Deployment constants for the webhook transport.
pub struct GatewayConfig {
    /// Shared secret for verifying inbound signatures.
    pub channel_secret: String,
    /// Out-of-band contact URL used in the fallback reply.
    pub contact_url: String,
    /// Public base URL under which saved media is reachable.
    pub public_base_url: String,
    /// Directory where received media is stored and served from.
    pub media_dir: PathBuf,
}

/// Shared application state.
pub struct AppState {
    dispatcher: Dispatcher,
    channel_secret: String,
}

/// The webhook gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Builds the axum router from its collaborators.
    ///
    /// Creates the media directory if it does not exist yet.
    pub fn build(
        catalog: Arc<SessionCatalog>,
        reconciler: Arc<AttendanceReconciler>,
        line: Arc<LineClient>,
        config: GatewayConfig,
    ) -> PitchbotResult<Router> {
        std::fs::create_dir_all(&config.media_dir)?;

        let interpreter = CommandInterpreter::new(
            catalog,
            reconciler,
            line.clone(),
            config.contact_url,
        );
        let dispatcher = Dispatcher::new(
            interpreter,
            line,
            config.media_dir.clone(),
            config.public_base_url,
        );

        let state = Arc::new(AppState {
            dispatcher,
            channel_secret: config.channel_secret,
        });

        Ok(Router::new()
            .route("/callback", post(callback_handler))
            .route("/health", get(health_handler))
            .nest_service("/static", ServeDir::new(config.media_dir))
            .with_state(state))
    }
}

async fn health_handler() -> impl IntoResponse {
    serde_json::json!({"status": "ok", "service": "pitchbot"}).to_string()
}

/// The single webhook endpoint.
///
/// Signature failures reject before any business logic runs. After a
/// verified dispatch the response is 200 `OK` regardless of business-logic
/// outcome; messaging-API errors are logged and swallowed, while calendar or
/// roster failures abort the batch with a 500.
async fn callback_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_signature(&state.channel_secret, body.as_bytes(), signature) {
        warn!("Rejected webhook: invalid signature");
        return (StatusCode::BAD_REQUEST, "Bad signature");
    }

    let envelope: WebhookEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Rejected webhook: malformed envelope");
            return (StatusCode::BAD_REQUEST, "Bad request");
        }
    };

    info!(events = envelope.events.len(), "Webhook accepted");

    for event in envelope.events {
        match state.dispatcher.dispatch(event).await {
            Ok(()) => {}
            Err(PitchbotError::Messaging(e)) => {
                // Reply-token expiry and friends must not fail the webhook.
                error!(error = %e, "Messaging API error (swallowed)");
            }
            Err(e) => {
                error!(error = %e, "Event dispatch failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Error");
            }
        }
    }

    (StatusCode::OK, "OK")
}
