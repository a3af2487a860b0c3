use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;

pub use announcement_repository::InMemoryAnnouncementRepository;

/// Owner of all announcement state, including nested comments and reactions.
///
/// Read methods return independent copies. Unknown announcement ids are an
/// error only for `update_status`, `add_comment` and `add_reaction`; the
/// other methods treat them as empty or as a no-op.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, title: String, description: Option<String>) -> Result<Announcement>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Announcement>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>>;
    async fn update_status(&self, id: &str, status: AnnouncementStatus) -> Result<Announcement>;
    async fn add_comment(&self, id: &str, author_name: String, text: String) -> Result<Comment>;
    /// Returns up to `limit` comments newest first, starting right after
    /// `cursor` when it names a comment on this announcement.
    async fn get_comments(&self, id: &str, cursor: Option<&str>, limit: usize) -> Result<Vec<Comment>>;
    /// `Ok(None)` means the idempotency key was already used inside the window
    /// and nothing changed.
    async fn add_reaction(&self, id: &str, reaction: NewReaction) -> Result<Option<Reaction>>;
    async fn remove_reaction(&self, id: &str, user_id: &str) -> Result<()>;
    async fn get_reactions(&self, id: &str) -> Result<Vec<Reaction>>;
}
