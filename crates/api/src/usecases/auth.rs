//! Registration, login, token refresh, logout and password reset.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use flixhub_core::error::CoreError;
use flixhub_core::roles::ROLE_USER;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_password_strength, validate_username, FieldErrors};
use flixhub_db::models::session::CreateSession;
use flixhub_db::models::user::{CreateUser, User, UserResponse};
use flixhub_db::repositories::{PasswordResetRepo, RoleRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_secret_token, hash_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::state::AppState;

/// Consecutive failed logins that lock an account.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a locked account stays locked.
pub const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Reset token is invalid or has expired";

// ---------------------------------------------------------------------------
// Shared types
// ---------------------------------------------------------------------------

/// Client metadata recorded on the refresh session.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(skip)]
    pub client: ClientInfo,
}

#[async_trait]
impl Request for RegisterRequest {
    type Response = AuthResponse;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if UserRepo::username_taken(&state.pool, self.username.trim(), None).await? {
            errors.add("username", "Username is already taken");
        }
        if UserRepo::email_taken(&state.pool, self.email.trim(), None).await? {
            errors.add("email", "Email is already registered");
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<AuthResponse> {
        let role = RoleRepo::find_by_name(&state.pool, ROLE_USER)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Role '{ROLE_USER}' is not seeded")))?;

        let password_hash = hash_password(&self.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            &state.pool,
            &CreateUser {
                username: self.username.trim().to_string(),
                email: normalize_email(&self.email),
                password_hash,
                first_name: super::trimmed(self.first_name),
                last_name: super::trimmed(self.last_name),
                role_id: role.id,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        issue_tokens(state, &user, role.name, &self.client).await
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(skip)]
    pub client: ClientInfo,
}

#[async_trait]
impl Request for LoginRequest {
    type Response = AuthResponse;

    async fn handle(self, state: &AppState) -> AppResult<AuthResponse> {
        let user = UserRepo::find_by_email(&state.pool, self.email.trim())
            .await?
            .ok_or_else(|| unauthorized(INVALID_CREDENTIALS))?;

        if !user.is_active {
            return Err(forbidden("Account is deactivated"));
        }

        if let Some(locked_until) = user.locked_until {
            if locked_until > Utc::now() {
                return Err(forbidden("Account is temporarily locked. Try again later."));
            }
        }

        let password_valid = verify_password(&self.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

        if !password_valid {
            let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
            if failures >= MAX_FAILED_ATTEMPTS {
                let lock_until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
                UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
                tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
            }
            return Err(unauthorized(INVALID_CREDENTIALS));
        }

        UserRepo::record_successful_login(&state.pool, user.id).await?;

        // Re-read so the response carries the fresh last_login_at.
        let user = UserRepo::find_by_id(&state.pool, user.id)
            .await?
            .ok_or_else(|| unauthorized(INVALID_CREDENTIALS))?;
        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

        issue_tokens(state, &user, role, &self.client).await
    }
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
    #[serde(skip)]
    pub client: ClientInfo,
}

#[async_trait]
impl Request for RefreshRequest {
    type Response = AuthResponse;

    async fn handle(self, state: &AppState) -> AppResult<AuthResponse> {
        let token_hash = hash_token(&self.refresh_token);
        let session = SessionRepo::find_live_by_hash(&state.pool, &token_hash)
            .await?
            .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

        let user = UserRepo::find_by_id(&state.pool, session.user_id)
            .await?
            .ok_or_else(|| unauthorized("User no longer exists"))?;

        if !user.is_active {
            return Err(forbidden("Account is deactivated"));
        }

        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        let access_token = sign_access_token(state, &user, &role)?;

        let (refresh_token, refresh_hash) = generate_secret_token();
        let replacement = new_session(state, user.id, refresh_hash, &self.client);
        SessionRepo::rotate(&state.pool, session.id, &replacement)
            .await?
            .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: state.config.jwt.access_expires_in_secs(),
            user: user.to_response(role),
        })
    }
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Revoke every refresh session of the caller.
#[derive(Debug, Validate)]
pub struct LogoutRequest {
    pub user_id: DbId,
}

#[async_trait]
impl Request for LogoutRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, self.user_id).await?;
        tracing::info!(user_id = self.user_id, revoked, "User logged out");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Forgot password
// ---------------------------------------------------------------------------

/// Start a password reset. Succeeds whether or not the account exists.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[async_trait]
impl Request for ForgotPasswordRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        let email = self.email.trim();
        let Some(user) = UserRepo::find_by_email(&state.pool, email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };
        if !user.is_active {
            tracing::debug!(user_id = user.id, "Password reset requested for inactive user");
            return Ok(());
        }

        let (token, token_hash) = generate_secret_token();
        let expiry_mins = state.config.password_reset_expiry_mins;
        let expires_at = Utc::now() + Duration::minutes(expiry_mins);
        PasswordResetRepo::issue(&state.pool, user.id, &token_hash, expires_at).await?;

        let link = reset_link(&state.config.frontend_url, &token, &user.email)?;
        if let Err(e) = state
            .mailer
            .send_password_reset(&user.email, &link, expiry_mins)
            .await
        {
            tracing::error!(user_id = user.id, error = %e, "Failed to send password reset email");
        }

        tracing::info!(user_id = user.id, "Password reset issued");
        Ok(())
    }
}

/// `{frontend}/reset-password?token=..&email=..`
pub fn reset_link(frontend_url: &Url, token: &str, email: &str) -> AppResult<Url> {
    let mut link = frontend_url.clone();
    link.path_segments_mut()
        .map_err(|_| AppError::InternalError("FRONTEND_URL cannot be a base URL".into()))?
        .pop_if_empty()
        .push("reset-password");
    link.query_pairs_mut()
        .clear()
        .append_pair("token", token)
        .append_pair("email", email);
    Ok(link)
}

// ---------------------------------------------------------------------------
// Reset password
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    /// The user and token id this request may redeem, if the token is valid.
    async fn redeemable(&self, state: &AppState) -> AppResult<Option<(User, DbId)>> {
        let Some(user) = UserRepo::find_by_email(&state.pool, self.email.trim()).await? else {
            return Ok(None);
        };
        let token = PasswordResetRepo::find_for_user(&state.pool, user.id, &hash_token(&self.token))
            .await?
            .filter(|t| t.is_redeemable(Utc::now()));
        Ok(token.map(|t| (user, t.id)))
    }
}

#[async_trait]
impl Request for ResetPasswordRequest {
    type Response = ();

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.redeemable(state).await?.is_none() {
            errors.add("token", INVALID_RESET_TOKEN);
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<()> {
        let (user, token_id) = self
            .redeemable(state)
            .await?
            .ok_or_else(|| FieldErrors::single("token", INVALID_RESET_TOKEN))?;

        let password_hash = hash_password(&self.new_password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        if !PasswordResetRepo::redeem(&state.pool, token_id, user.id, &password_hash).await? {
            return Err(FieldErrors::single("token", INVALID_RESET_TOKEN).into());
        }

        tracing::info!(user_id = user.id, "Password reset completed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

fn forbidden(message: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(message.into()))
}

fn sign_access_token(state: &AppState, user: &User, role: &str) -> AppResult<String> {
    generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

fn new_session(
    state: &AppState,
    user_id: DbId,
    refresh_token_hash: String,
    client: &ClientInfo,
) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash,
        expires_at: Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days),
        user_agent: client.user_agent.clone(),
        ip_address: client.ip_address.clone(),
    }
}

/// Sign an access token, persist a fresh refresh session and build the response.
async fn issue_tokens(
    state: &AppState,
    user: &User,
    role: String,
    client: &ClientInfo,
) -> AppResult<AuthResponse> {
    let access_token = sign_access_token(state, user, &role)?;
    let (refresh_token, refresh_hash) = generate_secret_token();
    SessionRepo::create(&state.pool, &new_session(state, user.id, refresh_hash, client)).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_expires_in_secs(),
        user: user.to_response(role),
    })
}
