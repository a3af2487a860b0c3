use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: AnnouncementStatus,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Active,
    Closed,
}

impl AnnouncementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementStatus::Active => "active",
            AnnouncementStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Up,
    Down,
    Heart,
}

impl ReactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Up => "up",
            ReactionType::Down => "down",
            ReactionType::Heart => "heart",
        }
    }
}

/// Input for the store's reaction upsert. Timestamps and ids are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewReaction {
    pub user_id: String,
    pub reaction_type: ReactionType,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnnouncementStatusRequest {
    pub status: AnnouncementStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub author_name: String,
    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReactionRequest {
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("must not be empty"));
        return Err(error);
    }
    Ok(())
}
