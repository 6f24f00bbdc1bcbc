pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod me;
pub mod plans;
pub mod subscriptions;
pub mod uploads;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register | login | refresh                 public
/// /auth/logout                                     requires auth
/// /auth/forgot-password | reset-password           public
///
/// /me                                              get, update profile
/// /me/change-password                              change password
///
/// /admin/users                                     list, create (admin)
/// /admin/users/{id}                                get, update, deactivate
/// /admin/subscriptions                             list (admin)
/// /admin/subscriptions/{id}                        get, delete
///
/// /plans                                           list (public), create (admin)
/// /plans/{id}                                      get (public), update, delete
///
/// /subscriptions                                   subscribe
/// /subscriptions/me                                caller's history
/// /subscriptions/me/current                        caller's active subscription
/// /subscriptions/{id}/cancel                       cancel (owner or admin)
///
/// /genres | /franchises | /collections             list (public), create (admin)
/// /genres/{id} | /franchises/{id} | ...            get (public), update, delete
///
/// /contents                                        list with filters, create
/// /contents/{id}                                   detail, update, delete
/// /contents/{id}/episodes                          episodes in viewing order
///
/// /episodes                                        create (admin)
/// /episodes/{id}                                   get, update, delete
///
/// /uploads/images | /uploads/videos                multipart upload (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", me::router())
        .nest("/admin", admin::router())
        .nest("/plans", plans::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/genres", catalog::genres())
        .nest("/franchises", catalog::franchises())
        .nest("/collections", catalog::collections())
        .nest("/contents", catalog::contents())
        .nest("/episodes", catalog::episodes())
        .nest("/uploads", uploads::router(&config.storage))
}
