//! Event lookup and creator-only mutations

use std::sync::Arc;

use sportmeet_shared::EntityId;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{CreateEvent, Event, UpdateEvent};
use crate::error::DomainError;
use crate::repositories::EventRepository;

pub struct EventService {
    events: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    /// A private event looks missing to everyone but its creator.
    pub async fn find_one(&self, viewer_id: EntityId, id: EntityId) -> Result<Event, DomainError> {
        self.events
            .find_by_id(id)
            .await?
            .filter(|event| event.is_visible_to(viewer_id))
            .ok_or(DomainError::EventNotFound)
    }

    /// A `max_members_count` of 0 means no limit.
    pub async fn create(&self, creator_id: EntityId, data: CreateEvent) -> Result<Event, DomainError> {
        data.validate()?;

        let max = data.max_members_count;
        if max > 0 && data.distinct_members().len() > max as usize {
            return Err(DomainError::TooManyMembers(max));
        }

        let event = self.events.create(creator_id, data).await?;
        info!(event_id = event.id, creator_id, "Event created");
        Ok(event)
    }

    pub async fn update(&self, caller_id: EntityId, update: UpdateEvent) -> Result<(), DomainError> {
        if update.is_empty() {
            return Err(DomainError::NothingToUpdate);
        }
        update.validate()?;

        let event = self.owned_by(caller_id, update.id).await?;
        self.events.update(update).await?;
        info!(event_id = event.id, "Event updated");
        Ok(())
    }

    pub async fn delete(&self, caller_id: EntityId, id: EntityId) -> Result<(), DomainError> {
        let event = self.owned_by(caller_id, id).await?;
        self.events.delete_with_dependents(event.id).await?;
        info!(event_id = event.id, "Event deleted");
        Ok(())
    }

    async fn owned_by(&self, caller_id: EntityId, id: EntityId) -> Result<Event, DomainError> {
        let event = self.find_one(caller_id, id).await?;
        if event.creator_id != caller_id {
            warn!(caller_id, event_id = id, "Refused to modify another user's event");
            return Err(DomainError::AccessDenied);
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewLocation;
    use crate::repositories::MockEventRepository;
    use chrono::Utc;

    fn event(id: EntityId, private: bool) -> Event {
        Event {
            id,
            title: "Beach volleyball".to_string(),
            about: "2v2".to_string(),
            sports: vec!["volleyball".to_string()],
            photo: "https://cdn.example.com/e.png".to_string(),
            video: None,
            date: Utc::now(),
            private,
            likes_count: 0,
            members_count: 1,
            comments_count: 0,
            max_members_count: 4,
            creator_id: 1,
            creator: None,
            location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored_events() -> MockEventRepository {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|id| {
            Ok(match id {
                1 => Some(event(1, false)),
                2 => Some(event(2, true)),
                _ => None,
            })
        });
        events
    }

    fn create_event(members: Vec<EntityId>, max_members_count: i32) -> CreateEvent {
        CreateEvent {
            members,
            title: "Beach volleyball".to_string(),
            about: "2v2 on sand".to_string(),
            sports: vec!["volleyball".to_string()],
            photo: "https://cdn.example.com/e.png".to_string(),
            video: None,
            date: Utc::now(),
            private: false,
            max_members_count,
            location: NewLocation { latitude: 1.0, longitude: 2.0, info: None },
        }
    }

    #[tokio::test]
    async fn test_private_event_hidden_from_others() {
        let service = EventService::new(Arc::new(stored_events()));

        assert_eq!(service.find_one(9, 1).await.unwrap().id, 1);
        assert!(matches!(service.find_one(9, 2).await, Err(DomainError::EventNotFound)));
        assert_eq!(service.find_one(1, 2).await.unwrap().id, 2);
        assert!(matches!(service.find_one(1, 3).await, Err(DomainError::EventNotFound)));
    }

    #[tokio::test]
    async fn test_create_checks_member_limit() {
        let mut events = MockEventRepository::new();
        events
            .expect_create()
            .times(2)
            .returning(|creator_id, _| Ok(Event { creator_id, ..event(5, false) }));
        let service = EventService::new(Arc::new(events));

        assert!(matches!(
            service.create(1, create_event(vec![2, 3, 4], 2)).await,
            Err(DomainError::TooManyMembers(2))
        ));
        assert_eq!(service.create(1, create_event(vec![2, 3, 3], 2)).await.unwrap().id, 5);
        assert!(service.create(1, create_event(vec![2, 3, 4], 0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_only_creator_deletes() {
        let mut events = stored_events();
        events
            .expect_delete_with_dependents()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));
        let service = EventService::new(Arc::new(events));

        assert!(matches!(service.delete(9, 1).await, Err(DomainError::AccessDenied)));
        assert!(matches!(service.delete(9, 2).await, Err(DomainError::EventNotFound)));
        assert!(matches!(service.delete(1, 3).await, Err(DomainError::EventNotFound)));
        service.delete(1, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_rules() {
        let mut events = stored_events();
        events
            .expect_update()
            .withf(|update| update.id == 2 && update.title.as_deref() == Some("Night volleyball"))
            .times(1)
            .returning(|_| Ok(()));
        let service = EventService::new(Arc::new(events));

        assert!(matches!(
            service.update(1, UpdateEvent { id: 2, ..Default::default() }).await,
            Err(DomainError::NothingToUpdate)
        ));

        let update = UpdateEvent {
            id: 2,
            title: Some("Night volleyball".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(9, update.clone()).await,
            Err(DomainError::EventNotFound)
        ));
        service.update(1, update).await.unwrap();
    }
}
