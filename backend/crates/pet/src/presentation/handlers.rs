//! HTTP Handlers

use crate::application::config::PetConfig;
use crate::application::init_data::InitDataVerifier;
use crate::application::interact::InteractUseCase;
use crate::application::read_state::ReadStateUseCase;
use crate::domain::repository::MoodRepository;
use crate::domain::services::unix_now;
use crate::error::PetResult;
use crate::presentation::dto::{InitDataRequest, MoodResponse, WebhookAck};
use crate::presentation::guard::authorize;
use axum::Json;
use axum::extract::State;
use platform::client::ClientIp;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

/// Shared state for pet handlers
pub struct PetAppState<R, L> {
    pub repo: Arc<R>,
    pub limiter: Arc<L>,
    pub verifier: Arc<InitDataVerifier>,
    pub config: Arc<PetConfig>,
}

impl<R, L> PetAppState<R, L> {
    pub fn new(repo: R, limiter: L, config: PetConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            limiter: Arc::new(limiter),
            verifier: Arc::new(InitDataVerifier::new(
                &config.bot_token,
                config.init_data_lifetime,
            )),
            config: Arc::new(config),
        }
    }
}

impl<R, L> Clone for PetAppState<R, L> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            limiter: self.limiter.clone(),
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /state
pub async fn read_state<R, L>(
    State(state): State<PetAppState<R, L>>,
    client_ip: ClientIp,
    Json(req): Json<InitDataRequest>,
) -> PetResult<Json<MoodResponse>>
where
    R: MoodRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let identity = authorize(&state, client_ip, &req.init_data).await?;

    let use_case = ReadStateUseCase::new(state.repo.clone());
    let record = use_case.execute(&identity, unix_now()).await?;

    Ok(Json(record.into()))
}

/// POST /pet
pub async fn pet<R, L>(
    State(state): State<PetAppState<R, L>>,
    client_ip: ClientIp,
    Json(req): Json<InitDataRequest>,
) -> PetResult<Json<MoodResponse>>
where
    R: MoodRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let identity = authorize(&state, client_ip, &req.init_data).await?;

    let use_case = InteractUseCase::new(state.repo.clone());
    let record = use_case.execute(&identity, unix_now()).await?;

    Ok(Json(record.into()))
}

/// POST /webhook
///
/// Acknowledges every JSON update; the body is only inspected for logging.
pub async fn webhook(Json(update): Json<serde_json::Value>) -> Json<WebhookAck> {
    let update_id = update.get("update_id").and_then(|id| id.as_i64());

    tracing::debug!(?update_id, "Webhook update received");

    Json(WebhookAck { ok: true })
}
