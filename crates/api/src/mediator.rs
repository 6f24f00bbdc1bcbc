//! Request dispatch with a validation pipeline.
//!
//! Every use case is a request struct implementing [`Request`]. Handlers never
//! call a use case directly; they hand the request to [`send`], which:
//!
//! 1. opens a tracing span named after the request type,
//! 2. runs the synchronous field rules ([`Request::validate_fields`]),
//! 3. if those pass, runs the rules that consult the database
//!    ([`Request::validate_with_store`]),
//! 4. and only then calls [`Request::handle`].
//!
//! Any validation failure becomes a 400 with a per-field `errors` map and the
//! handler does not run.

use async_trait::async_trait;
use flixhub_core::validation::FieldErrors;
use tracing::Instrument;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// A command or query with its own validation rules and handler.
#[async_trait]
pub trait Request: Validate + Send + Sync + Sized + 'static {
    type Response: Send;

    /// Field rules that need no I/O. Defaults to the `validator` derive.
    fn validate_fields(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    /// Rules that read the database (uniqueness, existence).
    ///
    /// Returns the collected field errors; an empty map means valid.
    /// Database failures propagate as errors of their own.
    async fn validate_with_store(&self, _state: &AppState) -> AppResult<FieldErrors> {
        Ok(FieldErrors::new())
    }

    async fn handle(self, state: &AppState) -> AppResult<Self::Response>;
}

/// Validate and dispatch `request`.
pub async fn send<R: Request>(state: &AppState, request: R) -> AppResult<R::Response> {
    let span = tracing::debug_span!("usecase", request = request_name::<R>());

    async move {
        if let Err(errors) = request.validate_fields() {
            tracing::debug!(%errors, "Request rejected by field rules");
            return Err(errors.into());
        }

        let errors = request.validate_with_store(state).await?;
        if !errors.is_empty() {
            tracing::debug!(%errors, "Request rejected by store rules");
            return Err(errors.into());
        }

        request.handle(state).await
    }
    .instrument(span)
    .await
}

/// Unqualified type name, e.g. `CreateGenreRequest`.
fn request_name<R>() -> &'static str {
    let full = std::any::type_name::<R>();
    full.rsplit("::").next().unwrap_or(full)
}
