use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AccountError, Result},
    users::{
        repo::UserRepository,
        repo_types::{NewUser, Preference, ProfileDetails, User},
    },
};

/// Map-backed repository with the same uniqueness rules as the `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
    writes: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts and updates so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn missing(id: Uuid) -> AccountError {
        AccountError::Unexpected(format!("User {id} not found"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AccountError::DuplicateUser);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            gender: new_user.gender.clone(),
            birth_date: new_user.birth_date,
            city: new_user.city.clone(),
            profession: new_user.profession.clone(),
            phone_number: new_user.phone_number.clone(),
            image: None,
            description: None,
            social_links: Json(Vec::new()),
            preferences: Json(Vec::new()),
            number_of_roommates_needed: None,
            has_rented_room: None,
            people_living_with: None,
            current_rent_price: None,
            budget: None,
            completed_registration: false,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    async fn update_details(&self, id: Uuid, details: &ProfileDetails) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        if let Some(links) = &details.social_links {
            user.social_links = Json(links.clone());
        }
        user.number_of_roommates_needed = details
            .number_of_roommates_needed
            .or(user.number_of_roommates_needed);
        user.has_rented_room = details.has_rented_room.or(user.has_rented_room);
        user.people_living_with = details.people_living_with.or(user.people_living_with);
        user.current_rent_price = details.current_rent_price.or(user.current_rent_price);
        user.budget = details.budget.or(user.budget);
        if let Some(image) = &details.image {
            user.image = Some(image.clone());
        }
        if let Some(description) = &details.description {
            user.description = Some(description.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn complete_registration(&self, id: Uuid, preferences: &[Preference]) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        user.preferences = Json(preferences.to_vec());
        user.completed_registration = true;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_completed(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut done: Vec<User> = users
            .values()
            .filter(|u| u.completed_registration)
            .cloned()
            .collect();
        done.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(done)
    }
}
