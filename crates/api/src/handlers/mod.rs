//! HTTP handlers.
//!
//! Each submodule holds the axum handler functions for one resource. Handlers
//! only translate between HTTP and use cases: they pull ids from the path and
//! the caller from the token, build the request struct and dispatch it through
//! [`mediator::send`](crate::mediator::send).

pub mod auth;
pub mod collections;
pub mod contents;
pub mod episodes;
pub mod franchises;
pub mod genres;
pub mod me;
pub mod plans;
pub mod subscriptions;
pub mod uploads;
pub mod users;
