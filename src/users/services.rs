use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        cookie::SessionCookie,
        dto::{PublicUser, RegisterRequest, RegisteredUser},
        jwt::JwtKeys,
        password::PasswordHasher,
    },
    config::SessionConfig,
    directory::cache::{ViewInvalidator, FIND_ROOMMATES_PATH},
    error::{AccountError, Result},
    users::{
        repo::UserRepository,
        repo_types::{NewUser, Preference, ProfileDetails, User},
    },
};

/// Result of a successful login: what to show and what to set.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub cookie: SessionCookie,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            avatar: u.image.clone(),
        }
    }
}

/// Login, signup and the two profile-completion steps.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    keys: JwtKeys,
    session: SessionConfig,
    invalidator: Arc<dyn ViewInvalidator>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        keys: JwtKeys,
        session: SessionConfig,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            users,
            hasher,
            keys,
            session,
            invalidator,
        }
    }

    /// Checks the credentials and issues a session cookie.
    ///
    /// Unknown email and wrong password fail with the same
    /// `InvalidCredentials`, and no cookie is produced on any error.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => {
                warn!("login unknown email");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, &user.email)?;
        let cookie = SessionCookie::session(&self.session.cookie_name, token, self.keys.ttl);

        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome {
            user: PublicUser::from(&user),
            cookie,
        })
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisteredUser> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            warn!("email already registered");
            return Err(AccountError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            gender: request.gender,
            birth_date: request.birth_date,
            city: request.city,
            profession: request.profession,
            phone_number: request.phone_number,
        };

        // A concurrent signup may still win the unique index; the repository
        // reports that as DuplicateUser too.
        let user = self.users.create(&new_user).await?;

        info!(user_id = %user.id, "user registered");
        Ok(RegisteredUser { user_id: user.id })
    }

    #[instrument(skip(self, details))]
    pub async fn update_profile_details(
        &self,
        user_id: Option<&str>,
        details: &ProfileDetails,
    ) -> Result<()> {
        let id = parse_user_id(user_id)?;
        self.users.update_details(id, details).await?;
        info!(user_id = %id, "profile details saved");
        Ok(())
    }

    #[instrument(skip(self, preferences), fields(count = preferences.len()))]
    pub async fn complete_registration(
        &self,
        user_id: Option<&str>,
        preferences: &[Preference],
    ) -> Result<()> {
        let id = parse_user_id(user_id)?;
        self.users.complete_registration(id, preferences).await?;
        self.invalidator.revalidate(FIND_ROOMMATES_PATH).await;
        info!(user_id = %id, "registration completed");
        Ok(())
    }

    pub async fn current_user(&self, id: Uuid) -> Result<PublicUser> {
        self.users
            .find_by_id(id)
            .await?
            .map(|u| PublicUser::from(&u))
            .ok_or(AccountError::Unauthorized)
    }
}

fn parse_user_id(user_id: Option<&str>) -> Result<Uuid> {
    let raw = user_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AccountError::Unauthorized)?;
    Uuid::parse_str(raw).map_err(|e| AccountError::Unexpected(format!("Malformed user id: {e}")))
}
