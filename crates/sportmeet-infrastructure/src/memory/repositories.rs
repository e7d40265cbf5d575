use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use sportmeet_core::domain::{
    CreateEvent, Event, Location, NewLocation, NewSession, NewUser, Session, UpdateEvent, UpdateUser, User,
};
use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::{EventRepository, SessionRepository, UserRepository};
use sportmeet_shared::EntityId;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    notification_tokens: Vec<(EntityId, String)>,
    events: Vec<Event>,
    event_members: Vec<(EntityId, EntityId)>,
    next_user_id: EntityId,
    next_session_id: EntityId,
    next_event_id: EntityId,
    next_location_id: EntityId,
}

impl Tables {
    fn insert_session(&mut self, session: NewSession) -> Session {
        self.next_session_id += 1;
        let row = Session {
            session_id: self.next_session_id,
            token: session.token,
            user_id: session.user_id,
            expires_at: session.expires_at,
        };
        self.sessions.push(row.clone());
        row
    }

    fn insert_location(&mut self, location: &NewLocation) -> Location {
        self.next_location_id += 1;
        Location {
            id: self.next_location_id,
            latitude: location.latitude,
            longitude: location.longitude,
            info: location.info.clone(),
        }
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store an event under a fresh id, attaching its creator's profile.
    pub fn insert_event(&self, mut event: Event) -> Event {
        let mut tables = self.tables.lock();
        tables.next_event_id += 1;
        event.id = tables.next_event_id;
        event.creator = tables
            .users
            .iter()
            .find(|u| u.id == event.creator_id)
            .map(User::profile);
        tables.events.push(event.clone());
        event
    }

    /// Member user ids of an event.
    pub fn members_of(&self, event_id: EntityId) -> Vec<EntityId> {
        self.tables
            .lock()
            .event_members
            .iter()
            .filter(|(event, _)| *event == event_id)
            .map(|(_, user)| *user)
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().sessions.len()
    }

    pub fn notification_tokens_of(&self, user_id: EntityId) -> Vec<String> {
        self.tables
            .lock()
            .notification_tokens
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, token)| token.clone())
            .collect()
    }
}

pub struct MemoryUserRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryUserRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError> {
        Ok(self.db.tables.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .db
            .tables
            .lock()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_email_or_user_name(&self, email: &str, user_name: &str) -> Result<bool, DomainError> {
        Ok(self
            .db
            .tables
            .lock()
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email) || u.user_name == user_name))
    }

    async fn find_many(&self, limit: i64) -> Result<Vec<User>, DomainError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.db.tables.lock().users.iter().take(limit).cloned().collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.db.tables.lock();
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email) || u.user_name == user.user_name)
        {
            return Err(DomainError::EmailOrUserNameTaken);
        }

        tables.next_user_id += 1;
        let row = User {
            id: tables.next_user_id,
            email: user.email,
            user_name: user.user_name,
            password_hash: user.password_hash,
            avatar: user.avatar,
            full_name: user.full_name,
            about: user.about,
            sports: user.sports,
            followers_count: 0,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn update_password(&self, id: EntityId, password_hash: &str) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_profile(&self, update: UpdateUser) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        let taken = tables.users.iter().any(|u| {
            u.id != update.id
                && (update.email.as_deref().is_some_and(|e| u.email.eq_ignore_ascii_case(e))
                    || update.user_name.as_deref() == Some(u.user_name.as_str()))
        });
        if taken {
            return Err(DomainError::EmailOrUserNameTaken);
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == update.id)
            .ok_or(DomainError::UserNotFound)?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(user_name) = update.user_name {
            user.user_name = user_name;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(about) = update.about {
            user.about = about;
        }
        if let Some(sports) = update.sports {
            user.sports = sports;
        }
        Ok(())
    }

    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(DomainError::UserNotFound);
        }
        tables.sessions.retain(|s| s.user_id != id);
        tables.notification_tokens.retain(|(owner, _)| *owner != id);
        tables.event_members.retain(|(_, member)| *member != id);
        tables.users.retain(|u| u.id != id);
        Ok(())
    }

    async fn add_notification_token(&self, user_id: EntityId, token: &str) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        if tables.notification_tokens.iter().any(|(_, t)| t == token) {
            return Err(DomainError::DatabaseError("notification token already saved".to_string()));
        }
        tables.notification_tokens.push((user_id, token.to_string()));
        Ok(())
    }
}

pub struct MemorySessionRepository {
    db: Arc<MemoryDatabase>,
}

impl MemorySessionRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, DomainError> {
        Ok(self.db.tables.lock().insert_session(session))
    }

    async fn find(&self, session_id: EntityId, token: &str) -> Result<Option<Session>, DomainError> {
        Ok(self
            .db
            .tables
            .lock()
            .sessions
            .iter()
            .find(|s| s.session_id == session_id && s.token == token)
            .cloned())
    }

    async fn delete(&self, session_id: EntityId) -> Result<(), DomainError> {
        self.db.tables.lock().sessions.retain(|s| s.session_id != session_id);
        Ok(())
    }

    async fn rotate(&self, old_session_id: EntityId, replacement: NewSession) -> Result<Session, DomainError> {
        let mut tables = self.db.tables.lock();
        let Some(position) = tables.sessions.iter().position(|s| s.session_id == old_session_id) else {
            return Err(DomainError::SessionNotFound);
        };
        tables.sessions.remove(position);
        Ok(tables.insert_session(replacement))
    }
}

pub struct MemoryEventRepository {
    db: Arc<MemoryDatabase>,
}

impl MemoryEventRepository {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Event>, DomainError> {
        Ok(self.db.tables.lock().events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_public(&self, limit: i64) -> Result<Vec<Event>, DomainError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut events: Vec<Event> = self
            .db
            .tables
            .lock()
            .events
            .iter()
            .filter(|e| !e.private)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        events.truncate(limit);
        Ok(events)
    }

    async fn create(&self, creator_id: EntityId, data: CreateEvent) -> Result<Event, DomainError> {
        let members = data.distinct_members();
        let mut tables = self.db.tables.lock();
        if !members.iter().all(|id| tables.users.iter().any(|u| u.id == *id)) {
            return Err(DomainError::UnknownMember);
        }

        let location = tables.insert_location(&data.location);
        tables.next_event_id += 1;
        let now = Utc::now();
        let event = Event {
            id: tables.next_event_id,
            title: data.title,
            about: data.about,
            sports: data.sports,
            photo: data.photo,
            video: data.video,
            date: data.date,
            private: data.private,
            likes_count: 0,
            members_count: members.len() as i32,
            comments_count: 0,
            max_members_count: data.max_members_count,
            creator_id,
            creator: tables.users.iter().find(|u| u.id == creator_id).map(User::profile),
            location: Some(location),
            created_at: now,
            updated_at: now,
        };

        let event_id = event.id;
        tables.event_members.extend(members.into_iter().map(|user| (event_id, user)));
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn update(&self, update: UpdateEvent) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        let Some(position) = tables.events.iter().position(|e| e.id == update.id) else {
            return Err(DomainError::EventNotFound);
        };

        let current_location_id = tables.events[position].location.as_ref().map(|l| l.id);
        let location = match (&update.location, current_location_id) {
            (Some(location), Some(id)) => Some(Location {
                id,
                latitude: location.latitude,
                longitude: location.longitude,
                info: location.info.clone(),
            }),
            (Some(location), None) => Some(tables.insert_location(location)),
            (None, _) => None,
        };

        let event = &mut tables.events[position];
        if let Some(title) = update.title {
            event.title = title;
        }
        if let Some(about) = update.about {
            event.about = about;
        }
        if let Some(sports) = update.sports {
            event.sports = sports;
        }
        if let Some(photo) = update.photo {
            event.photo = photo;
        }
        if let Some(video) = update.video {
            event.video = Some(video);
        }
        if let Some(date) = update.date {
            event.date = date;
        }
        if let Some(private) = update.private {
            event.private = private;
        }
        if let Some(max) = update.max_members_count {
            event.max_members_count = max;
        }
        if location.is_some() {
            event.location = location;
        }
        event.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError> {
        let mut tables = self.db.tables.lock();
        if !tables.events.iter().any(|e| e.id == id) {
            return Err(DomainError::EventNotFound);
        }
        tables.event_members.retain(|(event, _)| *event != id);
        tables.events.retain(|e| e.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(n: u32) -> NewUser {
        NewUser {
            email: format!("player{n}@sport.io"),
            user_name: format!("player{n}"),
            password_hash: "hash".to_string(),
            avatar: "https://cdn.example.com/a.png".to_string(),
            full_name: "Some Player".to_string(),
            about: String::new(),
            sports: vec![],
        }
    }

    fn new_session(user_id: EntityId, token: &str) -> NewSession {
        NewSession {
            user_id,
            token: token.to_string(),
            expires_at: Utc::now() + Duration::days(1),
        }
    }

    fn event(creator_id: EntityId, private: bool, days_ahead: i64) -> Event {
        Event {
            id: 0,
            title: "Morning run".to_string(),
            about: "5k".to_string(),
            sports: vec!["running".to_string()],
            photo: "https://cdn.example.com/e.png".to_string(),
            video: None,
            date: Utc::now() + Duration::days(days_ahead),
            private,
            likes_count: 0,
            members_count: 1,
            comments_count: 0,
            max_members_count: 10,
            creator_id,
            creator: None,
            location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_rotate_is_single_use() {
        let db = MemoryDatabase::new();
        let sessions = MemorySessionRepository::new(db.clone());

        let original = sessions.create(new_session(1, "a")).await.unwrap();
        let rotated = sessions.rotate(original.session_id, new_session(1, "b")).await.unwrap();

        assert_ne!(rotated.session_id, original.session_id);
        assert!(sessions.find(original.session_id, "a").await.unwrap().is_none());
        assert!(sessions.find(rotated.session_id, "b").await.unwrap().is_some());

        let again = sessions.rotate(original.session_id, new_session(1, "c")).await;
        assert!(matches!(again, Err(DomainError::SessionNotFound)));
        assert_eq!(db.session_count(), 1, "failed rotation leaves no replacement");
    }

    #[tokio::test]
    async fn test_find_requires_matching_token() {
        let sessions = MemorySessionRepository::new(MemoryDatabase::new());
        let session = sessions.create(new_session(1, "right")).await.unwrap();
        assert!(sessions.find(session.session_id, "wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_removes_dependents() {
        let db = MemoryDatabase::new();
        let users = MemoryUserRepository::new(db.clone());
        let sessions = MemorySessionRepository::new(db.clone());

        let keep = users.create(new_user(1)).await.unwrap();
        let gone = users.create(new_user(2)).await.unwrap();
        sessions.create(new_session(keep.id, "k")).await.unwrap();
        sessions.create(new_session(gone.id, "g1")).await.unwrap();
        sessions.create(new_session(gone.id, "g2")).await.unwrap();
        users.add_notification_token(gone.id, "ExponentPushToken[g]").await.unwrap();

        users.delete_with_dependents(gone.id).await.unwrap();

        assert_eq!(db.session_count(), 1);
        assert!(db.notification_tokens_of(gone.id).is_empty());
        assert!(users.find_by_id(gone.id).await.unwrap().is_none());
        assert!(matches!(
            users.delete_with_dependents(gone.id).await,
            Err(DomainError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_users_rejected() {
        let users = MemoryUserRepository::new(MemoryDatabase::new());
        users.create(new_user(1)).await.unwrap();

        assert!(users.exists_by_email_or_user_name("PLAYER1@sport.io", "other").await.unwrap());
        assert!(matches!(users.create(new_user(1)).await, Err(DomainError::EmailOrUserNameTaken)));
    }

    fn create_event(members: Vec<EntityId>) -> CreateEvent {
        CreateEvent {
            members,
            title: "Evening tennis".to_string(),
            about: "Doubles".to_string(),
            sports: vec!["tennis".to_string()],
            photo: "https://cdn.example.com/t.png".to_string(),
            video: None,
            date: Utc::now() + Duration::days(2),
            private: false,
            max_members_count: 4,
            location: NewLocation { latitude: 55.7, longitude: 37.6, info: Some("Court 3".to_string()) },
        }
    }

    #[tokio::test]
    async fn test_event_create_update_delete() {
        let db = MemoryDatabase::new();
        let users = MemoryUserRepository::new(db.clone());
        let events = MemoryEventRepository::new(db.clone());
        let creator = users.create(new_user(1)).await.unwrap();
        let member = users.create(new_user(2)).await.unwrap();

        assert!(matches!(
            events.create(creator.id, create_event(vec![member.id, 99])).await,
            Err(DomainError::UnknownMember)
        ));
        assert!(events.find_public(10).await.unwrap().is_empty(), "nothing left behind");

        let event = events.create(creator.id, create_event(vec![member.id, member.id])).await.unwrap();
        assert_eq!(event.members_count, 1);
        assert_eq!(db.members_of(event.id), vec![member.id]);
        assert_eq!(event.creator.as_ref().map(|c| c.id), Some(creator.id));

        let update = UpdateEvent {
            id: event.id,
            title: Some("Morning tennis".to_string()),
            location: Some(NewLocation { latitude: 1.0, longitude: 2.0, info: None }),
            ..Default::default()
        };
        events.update(update).await.unwrap();
        let updated = events.find_by_id(event.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Morning tennis");
        let location = updated.location.unwrap();
        assert_eq!(location.id, event.location.unwrap().id);
        assert_eq!((location.latitude, location.longitude), (1.0, 2.0));

        events.delete_with_dependents(event.id).await.unwrap();
        assert!(events.find_by_id(event.id).await.unwrap().is_none());
        assert!(db.members_of(event.id).is_empty());
        assert!(matches!(
            events.delete_with_dependents(event.id).await,
            Err(DomainError::EventNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_names_unique() {
        let users = MemoryUserRepository::new(MemoryDatabase::new());
        let first = users.create(new_user(1)).await.unwrap();
        users.create(new_user(2)).await.unwrap();

        let clash = UpdateUser {
            id: first.id,
            user_name: Some("player2".to_string()),
            ..Default::default()
        };
        assert!(matches!(users.update_profile(clash).await, Err(DomainError::EmailOrUserNameTaken)));

        let rename = UpdateUser {
            id: first.id,
            full_name: Some("Renamed Player".to_string()),
            ..Default::default()
        };
        users.update_profile(rename).await.unwrap();
        assert_eq!(users.find_by_id(first.id).await.unwrap().unwrap().full_name, "Renamed Player");
    }

    #[tokio::test]
    async fn test_find_public_skips_private_newest_first() {
        let db = MemoryDatabase::new();
        let users = MemoryUserRepository::new(db.clone());
        let creator = users.create(new_user(1)).await.unwrap();

        let soon = db.insert_event(event(creator.id, false, 1));
        db.insert_event(event(creator.id, true, 2));
        let later = db.insert_event(event(creator.id, false, 3));

        let events = MemoryEventRepository::new(db.clone());
        let public = events.find_public(10).await.unwrap();
        assert_eq!(public.iter().map(|e| e.id).collect::<Vec<_>>(), vec![later.id, soon.id]);
        assert_eq!(public[0].creator.as_ref().map(|c| c.id), Some(creator.id));

        assert_eq!(events.find_public(1).await.unwrap().len(), 1);
    }
}
