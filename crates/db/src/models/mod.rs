//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod collection;
pub mod content;
pub mod episode;
pub mod franchise;
pub mod genre;
pub mod password_reset;
pub mod plan;
pub mod role;
pub mod session;
pub mod subscription;
pub mod user;
