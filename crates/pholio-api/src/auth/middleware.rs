//! Request gate for mutating endpoints.
//!
//! Fail-closed ordering: missing server-side Access configuration is 403,
//! missing cookie is 403, a present-but-invalid token is 401. In
//! non-production environments the whole gate is skipped.

use crate::auth::{AccessGate, ACCESS_COOKIE};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pholio_core::{AppError, Config};
use std::sync::Arc;

/// State for the auth middleware. `gate` is `None` when the Access team
/// domain or policy AUD was not configured.
#[derive(Clone)]
pub struct AccessState {
    pub config: Config,
    pub gate: Option<Arc<AccessGate>>,
}

impl AccessState {
    pub fn from_config(config: Config) -> Self {
        let gate = match (&config.access_team_domain, &config.access_policy_aud) {
            (Some(domain), Some(aud)) => {
                Some(Arc::new(AccessGate::new(domain.clone(), aud.clone(), None)))
            }
            _ => None,
        };
        Self { config, gate }
    }
}

pub async fn require_access(
    State(access): State<AccessState>,
    request: Request,
    next: Next,
) -> Response {
    if access.config.auth_bypassed() {
        tracing::debug!("Skipping auth verification outside production");
        return next.run(request).await;
    }

    let gate = match &access.gate {
        Some(gate) => gate.clone(),
        None => {
            tracing::error!(
                has_team_domain = access.config.access_team_domain.is_some(),
                has_policy_aud = access.config.access_policy_aud.is_some(),
                "Access configuration missing"
            );
            return HttpAppError(AppError::Forbidden(
                "Access configuration missing".to_string(),
            ))
            .into_response();
        }
    };

    let token = match extract_cookie(&request, ACCESS_COOKIE) {
        Some(token) => token,
        None => {
            tracing::warn!("No {} cookie found", ACCESS_COOKIE);
            return HttpAppError(AppError::Forbidden(
                "Missing authorization cookie".to_string(),
            ))
            .into_response();
        }
    };

    match gate.validate_token(&token).await {
        Ok(claims) => {
            tracing::info!(
                user_id = ?claims.sub,
                email = ?claims.email,
                "Authentication successful"
            );
            let mut request = request;
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(error = %err, "Token verification failed");
            HttpAppError(err).into_response()
        }
    }
}

fn extract_cookie(request: &Request, name: &str) -> Option<String> {
    let header = request.headers().get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}
