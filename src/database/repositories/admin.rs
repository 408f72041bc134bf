//! Admin repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::admin::AdminProfile;
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, ADMIN_PREFIX, ID_WIDTH};

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next public admin id inside the caller's transaction
    pub async fn next_admin_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT admin_id FROM admins")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(ADMIN_PREFIX, ID_WIDTH, &existing))
    }

    /// Create a new admin account
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        admin_id: &str,
        full_name: &str,
        admin_name: &str,
        contact_no: &str,
        email: &str,
        gender: &str,
        password: &str,
    ) -> Result<AdminProfile, CampusBuddyError> {
        let admin = sqlx::query_as::<_, AdminProfile>(
            r#"
            INSERT INTO admins (admin_id, full_name, admin_name, contact_no, email, gender, password)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, admin_id, full_name, admin_name, contact_no, email, gender, password, created_at
            "#
        )
        .bind(admin_id)
        .bind(full_name)
        .bind(admin_name)
        .bind(contact_no)
        .bind(email)
        .bind(gender)
        .bind(password)
        .fetch_one(&mut **tx)
        .await?;

        Ok(admin)
    }

    /// Find an admin by public id
    pub async fn find_by_admin_id(
        &self,
        admin_id: &str,
    ) -> Result<Option<AdminProfile>, CampusBuddyError> {
        let admin = sqlx::query_as::<_, AdminProfile>(
            "SELECT id, admin_id, full_name, admin_name, contact_no, email, gender, password, created_at FROM admins WHERE admin_id = $1"
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find an admin by login name, case-insensitively
    pub async fn find_by_admin_name_iexact(
        &self,
        admin_name: &str,
    ) -> Result<Option<AdminProfile>, CampusBuddyError> {
        let admin = sqlx::query_as::<_, AdminProfile>(
            "SELECT id, admin_id, full_name, admin_name, contact_no, email, gender, password, created_at FROM admins WHERE LOWER(admin_name) = LOWER($1) ORDER BY id LIMIT 1"
        )
        .bind(admin_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Check whether an admin email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, CampusBuddyError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM admins WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }

    /// Rewrite the stored credential, used by the transparent legacy upgrade
    pub async fn update_password(
        &self,
        admin_id: &str,
        password: &str,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query("UPDATE admins SET password = $2 WHERE admin_id = $1")
            .bind(admin_id)
            .bind(password)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
