//! Request Guard
//!
//! Authenticates a request's initData and charges it against the rate
//! limit. The limiter runs before the verdict is acted on: a throttled
//! caller learns nothing about its token and never reaches the store.

use chrono::Utc;
use platform::client::ClientIp;
use platform::rate_limit::RateLimitStore;

use crate::application::InitDataVerdict;
use crate::domain::value_objects::UserIdentity;
use crate::error::{PetError, PetResult};
use crate::presentation::handlers::PetAppState;

/// Resolve the caller's identity or the error to answer with
pub async fn authorize<R, L>(
    state: &PetAppState<R, L>,
    client_ip: ClientIp,
    init_data: &str,
) -> PetResult<UserIdentity>
where
    L: RateLimitStore,
{
    let verdict = state.verifier.verify(init_data, Utc::now().timestamp());

    // Only a verified token may name the bucket.
    let trust_forwarded_for = state.config.trust_forwarded_for;
    let limiter_key = match &verdict {
        InitDataVerdict::Valid(data) => data
            .identity()
            .map(|identity| identity.limiter_key())
            .unwrap_or_else(|| client_ip.limiter_key(trust_forwarded_for)),
        _ => client_ip.limiter_key(trust_forwarded_for),
    };

    match state
        .limiter
        .check_and_increment(&limiter_key, &state.config.rate_limit)
        .await
    {
        Ok(result) if !result.allowed => {
            return Err(PetError::RateLimited {
                retry_after_secs: result.retry_after_secs(),
            });
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(
                error = %e,
                key = %limiter_key,
                "Rate limiter unavailable, allowing request"
            );
        }
    }

    let data = verdict.into_result()?;
    data.identity()
        .ok_or_else(|| PetError::MalformedInitData("missing `user`".to_string()))
}
