use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(pub date_format, Date, "[year]-[month]-[day]");

/// One entry of a user's social profile list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Answer to one of the roommate-matching questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub question: String,
    pub answer: String,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    #[serde(with = "date_format")]
    pub birth_date: Date,
    pub city: String,
    pub profession: String,
    pub phone_number: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub social_links: Json<Vec<SocialLink>>,
    pub preferences: Json<Vec<Preference>>,
    pub number_of_roommates_needed: Option<i32>,
    pub has_rented_room: Option<bool>,
    pub people_living_with: Option<i32>,
    pub current_rent_price: Option<i32>,
    pub budget: Option<i32>,
    pub completed_registration: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields written by the first signup step.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: Date,
    pub city: String,
    pub profession: String,
    pub phone_number: String,
}

/// Fields written by the second signup step. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub social_links: Option<Vec<SocialLink>>,
    pub number_of_roommates_needed: Option<i32>,
    pub has_rented_room: Option<bool>,
    pub people_living_with: Option<i32>,
    pub current_rent_price: Option<i32>,
    pub budget: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}
