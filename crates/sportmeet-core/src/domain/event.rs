//! Sport event entity

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sportmeet_shared::EntityId;
use validator::{Validate, ValidationError};

use super::user::UserProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: EntityId,
    pub latitude: f64,
    pub longitude: f64,
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    pub about: String,
    pub sports: Vec<String>,
    pub photo: String,
    pub video: Option<String>,
    pub date: DateTime<Utc>,
    pub private: bool,
    pub likes_count: i32,
    pub members_count: i32,
    pub comments_count: i32,
    pub max_members_count: i32,
    pub creator_id: EntityId,
    pub creator: Option<UserProfile>,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Private events are visible to their creator only.
    pub fn is_visible_to(&self, user_id: EntityId) -> bool {
        !self.private || self.creator_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub info: Option<String>,
}

/// Event creation input. `members` are user ids joined at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[serde(default)]
    pub members: Vec<EntityId>,

    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[validate(length(min = 3, max = 1000))]
    pub about: String,

    #[validate(custom(function = "validate_event_sports"))]
    pub sports: Vec<String>,

    #[validate(url)]
    pub photo: String,

    pub video: Option<String>,
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub private: bool,

    #[validate(range(min = 0))]
    pub max_members_count: i32,

    pub location: NewLocation,
}

impl CreateEvent {
    /// Member ids with duplicates dropped, first occurrence kept.
    pub fn distinct_members(&self) -> Vec<EntityId> {
        let mut seen = HashSet::new();
        self.members.iter().copied().filter(|id| seen.insert(*id)).collect()
    }
}

/// Partial event update; only the creator may apply it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub id: EntityId,

    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 3, max = 1000))]
    pub about: Option<String>,

    #[validate(custom(function = "validate_event_sports"))]
    pub sports: Option<Vec<String>>,

    #[validate(url)]
    pub photo: Option<String>,

    pub video: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub private: Option<bool>,

    #[validate(range(min = 0))]
    pub max_members_count: Option<i32>,

    pub location: Option<NewLocation>,
}

impl UpdateEvent {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.about.is_none()
            && self.sports.is_none()
            && self.photo.is_none()
            && self.video.is_none()
            && self.date.is_none()
            && self.private.is_none()
            && self.max_members_count.is_none()
            && self.location.is_none()
    }
}

#[allow(clippy::ptr_arg)]
fn validate_event_sports(sports: &Vec<String>) -> Result<(), ValidationError> {
    if !sports.iter().all(|s| (3..=30).contains(&s.chars().count())) {
        return Err(ValidationError::new("sport_name_length"));
    }
    let distinct: HashSet<&String> = sports.iter().collect();
    if distinct.len() != sports.len() {
        return Err(ValidationError::new("sports_not_unique"));
    }
    Ok(())
}
