use std::sync::Arc;
use validator::Validate;

use crate::{
    config::StoreConfig,
    domain::{
        Announcement, Comment, CreateAnnouncementRequest, CreateCommentRequest, NewReaction,
        Reaction, ReactionType, UpdateAnnouncementStatusRequest,
    },
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

/// Result of a reaction submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionOutcome {
    Recorded(Reaction),
    /// Same idempotency key seen inside the window; nothing changed.
    Duplicate,
}

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    default_comment_limit: usize,
    max_comment_limit: usize,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>, config: &StoreConfig) -> Self {
        Self {
            repo,
            default_comment_limit: config.default_comment_limit,
            max_comment_limit: config.effective_max_comment_limit(),
        }
    }

    /// Create a new announcement
    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        request.validate()?;

        let announcement = self.repo.create(request.title, request.description).await?;
        tracing::info!(announcement_id = %announcement.id, "Announcement created");
        Ok(announcement)
    }

    /// List all announcements, newest first
    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list_all().await
    }

    /// Get an announcement by ID
    pub async fn get(&self, id: &str) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::announcement_not_found(id))
    }

    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateAnnouncementStatusRequest,
    ) -> Result<Announcement> {
        let announcement = self.repo.update_status(id, request.status).await?;
        tracing::info!(
            announcement_id = %id,
            status = announcement.status.as_str(),
            "Announcement status updated"
        );
        Ok(announcement)
    }

    pub async fn add_comment(&self, id: &str, request: CreateCommentRequest) -> Result<Comment> {
        request.validate()?;
        self.repo.add_comment(id, request.author_name, request.text).await
    }

    /// Page through comments newest first. A missing limit uses the configured
    /// default and anything above the maximum is clamped.
    pub async fn comments(
        &self,
        id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Comment>> {
        let limit = limit
            .unwrap_or(self.default_comment_limit)
            .min(self.max_comment_limit);
        let cursor = cursor.filter(|c| !c.is_empty());
        self.repo.get_comments(id, cursor, limit).await
    }

    pub async fn react(
        &self,
        id: &str,
        user_id: &str,
        reaction_type: ReactionType,
        idempotency_key: Option<String>,
    ) -> Result<ReactionOutcome> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::BadRequest("User identifier is required".to_string()));
        }

        let reaction = NewReaction {
            user_id: user_id.to_string(),
            reaction_type,
            idempotency_key,
        };

        match self.repo.add_reaction(id, reaction).await? {
            Some(reaction) => Ok(ReactionOutcome::Recorded(reaction)),
            None => {
                tracing::debug!(announcement_id = %id, user_id, "Idempotent replay, reaction skipped");
                Ok(ReactionOutcome::Duplicate)
            }
        }
    }

    pub async fn remove_reaction(&self, id: &str, user_id: &str) -> Result<()> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::BadRequest("User identifier is required".to_string()));
        }
        self.repo.remove_reaction(id, user_id).await
    }

    pub async fn reactions(&self, id: &str) -> Result<Vec<Reaction>> {
        self.repo.get_reactions(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::AnnouncementStatus,
        repository::InMemoryAnnouncementRepository,
    };

    fn service() -> AnnouncementService {
        let config = StoreConfig {
            default_comment_limit: 2,
            max_comment_limit: 3,
            ..StoreConfig::default()
        };
        AnnouncementService::new(Arc::new(InMemoryAnnouncementRepository::new(&config)), &config)
    }

    fn comment(text: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            author_name: "Jane".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_title_is_validation_error() {
        let service = service();
        let result = service
            .create(CreateAnnouncementRequest {
                title: " ".to_string(),
                description: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let result = service().get("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comment_limits_default_and_clamp() {
        let service = service();
        let created = service
            .create(CreateAnnouncementRequest {
                title: "Notice".to_string(),
                description: None,
            })
            .await
            .unwrap();
        for i in 0..5 {
            service.add_comment(&created.id, comment(&format!("c{}", i))).await.unwrap();
        }

        assert_eq!(service.comments(&created.id, None, None).await.unwrap().len(), 2);
        assert_eq!(service.comments(&created.id, None, Some(50)).await.unwrap().len(), 3);
        assert_eq!(service.comments(&created.id, Some(""), Some(1)).await.unwrap()[0].text, "c4");
    }

    #[tokio::test]
    async fn test_zero_max_limit_still_pages() {
        let config = StoreConfig {
            max_comment_limit: 0,
            ..StoreConfig::default()
        };
        let service = AnnouncementService::new(
            Arc::new(InMemoryAnnouncementRepository::new(&config)),
            &config,
        );
        let created = service
            .create(CreateAnnouncementRequest {
                title: "Notice".to_string(),
                description: None,
            })
            .await
            .unwrap();
        service.add_comment(&created.id, comment("c0")).await.unwrap();
        service.add_comment(&created.id, comment("c1")).await.unwrap();

        let page = service.comments(&created.id, None, None).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].text, "c1");
    }

    #[tokio::test]
    async fn test_overlong_comment_rejected() {
        let service = service();
        let created = service
            .create(CreateAnnouncementRequest {
                title: "Notice".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let result = service.add_comment(&created.id, comment(&"x".repeat(501))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_react_reports_duplicates() {
        let service = service();
        let created = service
            .create(CreateAnnouncementRequest {
                title: "Notice".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let first = service
            .react(&created.id, "u1", ReactionType::Up, Some("k".to_string()))
            .await
            .unwrap();
        assert!(matches!(first, ReactionOutcome::Recorded(_)));

        let second = service
            .react(&created.id, "u1", ReactionType::Down, Some("k".to_string()))
            .await
            .unwrap();
        assert_eq!(second, ReactionOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_blank_user_rejected() {
        let service = service();
        let result = service.react("any", "  ", ReactionType::Up, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_water_outage_scenario() {
        let service = service();
        let created = service
            .create(CreateAnnouncementRequest {
                title: "Water outage".to_string(),
                description: Some("Main st, 2pm-4pm".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.status, AnnouncementStatus::Active);

        let note = service
            .add_comment(&created.id, CreateCommentRequest {
                author_name: "Jane".to_string(),
                text: "Thanks for heads up".to_string(),
            })
            .await
            .unwrap();
        let after_comment = service.get(&created.id).await.unwrap();
        assert_eq!(after_comment.comments, vec![note.clone()]);
        assert_eq!(after_comment.last_activity_at, note.created_at);

        service.react(&created.id, "u1", ReactionType::Up, None).await.unwrap();
        service.react(&created.id, "u1", ReactionType::Heart, None).await.unwrap();
        let after_reactions = service.get(&created.id).await.unwrap();
        assert_eq!(after_reactions.reactions.len(), 1);
        assert_eq!(after_reactions.reactions[0].reaction_type, ReactionType::Heart);

        let closed = service
            .update_status(&created.id, UpdateAnnouncementStatusRequest {
                status: AnnouncementStatus::Closed,
            })
            .await
            .unwrap();
        assert_eq!(closed.status, AnnouncementStatus::Closed);
        assert_eq!(closed.last_activity_at, after_reactions.last_activity_at);
    }
}
