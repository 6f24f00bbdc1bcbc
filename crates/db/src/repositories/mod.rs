//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod collection_repo;
pub mod content_repo;
pub mod episode_repo;
pub mod franchise_repo;
pub mod genre_repo;
pub mod password_reset_repo;
pub mod plan_repo;
pub mod role_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use collection_repo::CollectionRepo;
pub use content_repo::ContentRepo;
pub use episode_repo::EpisodeRepo;
pub use franchise_repo::FranchiseRepo;
pub use genre_repo::GenreRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use plan_repo::PlanRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;

/// Turn a search term into an `ILIKE` substring pattern.
///
/// `%`, `_` and `\` in the term match literally; queries pair the bound
/// pattern with `ESCAPE '\'`.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    term.map(|t| {
        let mut pattern = String::with_capacity(t.len() + 2);
        pattern.push('%');
        for ch in t.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    })
}
