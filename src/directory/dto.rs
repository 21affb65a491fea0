use serde::Serialize;
use uuid::Uuid;

use crate::users::repo_types::{Preference, User};

/// Listing entry for a user who completed signup. No contact data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoommateCard {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub profession: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i32>,
    pub number_of_roommates_needed: Option<i32>,
    pub has_rented_room: Option<bool>,
    pub preferences: Vec<Preference>,
}

impl From<User> for RoommateCard {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            city: u.city,
            profession: u.profession,
            image: u.image,
            description: u.description,
            budget: u.budget,
            number_of_roommates_needed: u.number_of_roommates_needed,
            has_rented_room: u.has_rented_room,
            preferences: u.preferences.0,
        }
    }
}
