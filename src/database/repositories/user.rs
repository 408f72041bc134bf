//! User repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::user::UserProfile;
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, ID_WIDTH, USER_PREFIX};

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next public user id inside the caller's transaction
    pub async fn next_user_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT user_id FROM users")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(USER_PREFIX, ID_WIDTH, &existing))
    }

    /// Create a new user account
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, CampusBuddyError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (user_id, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, username, email, password, profile_info, preferences, created_at, updated_at
            "#
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }

    /// Find a user by public id
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<UserProfile>, CampusBuddyError> {
        let user = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, username, email, password, profile_info, preferences, created_at, updated_at FROM users WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// All accounts carrying a username, case-insensitively.
    /// Duplicate usernames are allowed, so this returns every candidate.
    pub async fn find_by_username_iexact(
        &self,
        username: &str,
    ) -> Result<Vec<UserProfile>, CampusBuddyError> {
        let users = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, username, email, password, profile_info, preferences, created_at, updated_at FROM users WHERE LOWER(username) = LOWER($1) ORDER BY id"
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, CampusBuddyError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }

    /// Rewrite the stored credential, used by the transparent legacy upgrade
    pub async fn update_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(password)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Update the two editable profile fields
    pub async fn update_profile(
        &self,
        user_id: &str,
        profile_info: Option<&str>,
        preferences: Option<&str>,
    ) -> Result<UserProfile, CampusBuddyError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET profile_info = $2,
                preferences = $3,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, username, email, password, profile_info, preferences, created_at, updated_at
            "#
        )
        .bind(user_id)
        .bind(profile_info)
        .bind(preferences)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, CampusBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
