//! Well-known role name constants.
//!
//! These must match the seed data in the `roles` migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Check whether a role name is one of the seeded roles.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_USER)
}
