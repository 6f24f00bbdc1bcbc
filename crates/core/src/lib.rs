//! Flixhub core library.
//!
//! Shared domain types, error definitions, role constants, pagination helpers
//! and validation primitives. This crate has no database or HTTP dependencies
//! so both the repository layer and the API layer can use it.

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
