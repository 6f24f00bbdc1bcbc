//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::usecases::auth::{
    AuthResponse, ClientInfo, ForgotPasswordRequest, LoginRequest, LogoutRequest,
    RefreshRequest, RegisterRequest, ResetPasswordRequest,
};

/// User agent and originating address as reported by the proxy chain.
fn client_info(headers: &HeaderMap) -> ClientInfo {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    ClientInfo {
        user_agent: header(USER_AGENT.as_str()),
        ip_address: header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty()),
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let request = RegisterRequest {
        client: client_info(&headers),
        ..input
    };
    let response = mediator::send(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let request = LoginRequest {
        client: client_info(&headers),
        ..input
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let request = RefreshRequest {
        client: client_info(&headers),
        ..input
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    mediator::send(&state, LogoutRequest { user_id: auth.user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Always 202 so the response does not reveal whether the email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    mediator::send(&state, input).await?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    mediator::send(&state, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn client_info_takes_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("flixhub-tv/2.1"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );

        let info = client_info(&headers);
        assert_eq!(info.user_agent.as_deref(), Some("flixhub-tv/2.1"));
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn client_info_tolerates_missing_headers() {
        let info = client_info(&HeaderMap::new());
        assert!(info.user_agent.is_none());
        assert!(info.ip_address.is_none());
    }
}
