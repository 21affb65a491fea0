use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    error::{AccountError, Result},
    users::repo_types::{NewUser, Preference, ProfileDetails, User},
};

/// Storage port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Insert a new user. A taken email yields `AccountError::DuplicateUser`.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    async fn update_details(&self, id: Uuid, details: &ProfileDetails) -> Result<()>;

    /// Replace preferences and mark the signup as finished.
    async fn complete_registration(&self, id: Uuid, preferences: &[Preference]) -> Result<()>;

    async fn list_completed(&self) -> Result<Vec<User>>;
}

const SELECT_USER: &str = r#"
    SELECT id, email, password_hash, first_name, last_name, gender, birth_date,
           city, profession, phone_number, image, description, social_links,
           preferences, number_of_roommates_needed, has_rented_room,
           people_living_with, current_rent_price, budget,
           completed_registration, created_at
    FROM users
"#;

const RETURNING_USER: &str = r#"
    RETURNING id, email, password_hash, first_name, last_name, gender, birth_date,
              city, profession, phone_number, image, description, social_links,
              preferences, number_of_roommates_needed, has_rented_room,
              people_living_with, current_rent_price, budget,
              completed_registration, created_at
"#;

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn not_found(id: Uuid) -> AccountError {
    AccountError::unexpected(format!("User {id} not found"))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, gender,
                               birth_date, city, profession, phone_number,
                               social_links, preferences, completed_registration)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '[]'::jsonb, '[]'::jsonb, FALSE)
            {RETURNING_USER}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.gender)
            .bind(new_user.birth_date)
            .bind(&new_user.city)
            .bind(&new_user.profession)
            .bind(&new_user.phone_number)
            .fetch_one(&self.db)
            .await?;
        Ok(user)
    }

    async fn update_details(&self, id: Uuid, details: &ProfileDetails) -> Result<()> {
        let done = sqlx::query(
            r#"
            UPDATE users
               SET social_links = COALESCE($2, social_links),
                   number_of_roommates_needed = COALESCE($3, number_of_roommates_needed),
                   has_rented_room = COALESCE($4, has_rented_room),
                   people_living_with = COALESCE($5, people_living_with),
                   current_rent_price = COALESCE($6, current_rent_price),
                   budget = COALESCE($7, budget),
                   image = COALESCE($8, image),
                   description = COALESCE($9, description)
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(details.social_links.as_ref().map(Json))
        .bind(details.number_of_roommates_needed)
        .bind(details.has_rented_room)
        .bind(details.people_living_with)
        .bind(details.current_rent_price)
        .bind(details.budget)
        .bind(&details.image)
        .bind(&details.description)
        .execute(&self.db)
        .await?;

        if done.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn complete_registration(&self, id: Uuid, preferences: &[Preference]) -> Result<()> {
        let done = sqlx::query(
            r#"
            UPDATE users
               SET preferences = $2,
                   completed_registration = TRUE
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(preferences))
        .execute(&self.db)
        .await?;

        if done.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list_completed(&self) -> Result<Vec<User>> {
        let sql = format!("{SELECT_USER} WHERE completed_registration ORDER BY created_at DESC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.db).await?;
        Ok(users)
    }
}
