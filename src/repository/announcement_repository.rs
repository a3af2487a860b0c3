use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::StoreConfig,
    domain::{
        Announcement, AnnouncementStatus, Clock, Comment, NewReaction, Reaction, SystemClock,
    },
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

struct AnnouncementRecord {
    id: String,
    title: String,
    description: Option<String>,
    status: AnnouncementStatus,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    /// Oldest first; callers see the reverse.
    comments: Vec<Comment>,
    /// Comment id -> index into `comments`.
    comment_positions: HashMap<String, usize>,
    reactions: Vec<Reaction>,
}

impl AnnouncementRecord {
    fn new(title: String, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            status: AnnouncementStatus::Active,
            created_at: now,
            last_activity_at: now,
            comments: Vec::new(),
            comment_positions: HashMap::new(),
            reactions: Vec::new(),
        }
    }

    fn snapshot(&self) -> Announcement {
        Announcement {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
            comments: self.comments.iter().rev().cloned().collect(),
            reactions: self.reactions.clone(),
        }
    }

    fn push_comment(&mut self, comment: Comment) {
        self.comment_positions
            .insert(comment.id.clone(), self.comments.len());
        self.last_activity_at = comment.created_at;
        self.comments.push(comment);
    }

    fn comments_after(&self, cursor: Option<&str>, limit: usize) -> Vec<Comment> {
        // Position p in storage order is index len - 1 - p newest first, so the
        // page after it starts at len - p.
        let start = cursor
            .and_then(|c| self.comment_positions.get(c))
            .map(|&position| self.comments.len() - position)
            .unwrap_or(0);

        self.comments
            .iter()
            .rev()
            .skip(start)
            .take(limit)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct StoreState {
    announcements: HashMap<String, AnnouncementRecord>,
    /// Insertion order, oldest first.
    order: Vec<String>,
}

pub struct InMemoryAnnouncementRepository {
    state: RwLock<StoreState>,
    clock: Arc<dyn Clock>,
    idempotency_window: Duration,
    prune_expired_idempotent_reactions: bool,
}

impl InMemoryAnnouncementRepository {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            clock,
            idempotency_window: config.idempotency_window(),
            prune_expired_idempotent_reactions: config.prune_expired_idempotent_reactions,
        }
    }

    fn within_window(&self, reaction: &Reaction, now: DateTime<Utc>) -> bool {
        now - reaction.created_at < self.idempotency_window
    }
}

impl Default for InMemoryAnnouncementRepository {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

#[async_trait]
impl AnnouncementRepository for InMemoryAnnouncementRepository {
    async fn create(&self, title: String, description: Option<String>) -> Result<Announcement> {
        let mut state = self.state.write().await;
        let record = AnnouncementRecord::new(title, description, self.clock.now());
        let announcement = record.snapshot();

        state.order.push(record.id.clone());
        state.announcements.insert(record.id.clone(), record);

        tracing::debug!(announcement_id = %announcement.id, "Announcement stored");
        Ok(announcement)
    }

    async fn list_all(&self) -> Result<Vec<Announcement>> {
        let state = self.state.read().await;
        Ok(state
            .order
            .iter()
            .rev()
            .filter_map(|id| state.announcements.get(id))
            .map(AnnouncementRecord::snapshot)
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>> {
        let state = self.state.read().await;
        Ok(state.announcements.get(id).map(AnnouncementRecord::snapshot))
    }

    async fn update_status(&self, id: &str, status: AnnouncementStatus) -> Result<Announcement> {
        let mut state = self.state.write().await;
        let record = state
            .announcements
            .get_mut(id)
            .ok_or_else(|| AppError::announcement_not_found(id))?;

        // Status changes do not count as activity.
        record.status = status;
        Ok(record.snapshot())
    }

    async fn add_comment(&self, id: &str, author_name: String, text: String) -> Result<Comment> {
        let mut state = self.state.write().await;
        let record = state
            .announcements
            .get_mut(id)
            .ok_or_else(|| AppError::announcement_not_found(id))?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author_name,
            text,
            created_at: self.clock.now(),
        };
        record.push_comment(comment.clone());

        tracing::debug!(announcement_id = %id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    async fn get_comments(&self, id: &str, cursor: Option<&str>, limit: usize) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .announcements
            .get(id)
            .map(|record| record.comments_after(cursor, limit))
            .unwrap_or_default())
    }

    async fn add_reaction(&self, id: &str, reaction: NewReaction) -> Result<Option<Reaction>> {
        let mut state = self.state.write().await;
        let record = state
            .announcements
            .get_mut(id)
            .ok_or_else(|| AppError::announcement_not_found(id))?;

        let now = self.clock.now();

        if self.prune_expired_idempotent_reactions {
            let before = record.reactions.len();
            record
                .reactions
                .retain(|r| r.idempotency_key.is_none() || self.within_window(r, now));
            let pruned = before - record.reactions.len();
            if pruned > 0 {
                tracing::debug!(announcement_id = %id, pruned, "Pruned expired keyed reactions");
            }
        }

        let idempotency_key = reaction.idempotency_key.filter(|k| !k.is_empty());

        if let Some(ref key) = idempotency_key {
            let duplicate = record.reactions.iter().any(|r| {
                r.idempotency_key.as_deref() == Some(key.as_str()) && self.within_window(r, now)
            });
            if duplicate {
                tracing::debug!(announcement_id = %id, idempotency_key = %key, "Duplicate reaction ignored");
                return Ok(None);
            }
        }

        record.reactions.retain(|r| r.user_id != reaction.user_id);

        let stored = Reaction {
            id: Uuid::new_v4().to_string(),
            user_id: reaction.user_id,
            reaction_type: reaction.reaction_type,
            created_at: now,
            idempotency_key,
        };
        record.reactions.push(stored.clone());
        record.last_activity_at = stored.created_at;

        tracing::debug!(
            announcement_id = %id,
            user_id = %stored.user_id,
            reaction = stored.reaction_type.as_str(),
            "Reaction recorded"
        );
        Ok(Some(stored))
    }

    async fn remove_reaction(&self, id: &str, user_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(record) = state.announcements.get_mut(id) {
            record.reactions.retain(|r| r.user_id != user_id);
            // Touched even when the user had nothing to remove.
            record.last_activity_at = self.clock.now();
        }
        Ok(())
    }

    async fn get_reactions(&self, id: &str) -> Result<Vec<Reaction>> {
        let state = self.state.read().await;
        Ok(state
            .announcements
            .get(id)
            .map(|record| record.reactions.clone())
            .unwrap_or_default())
    }
}
