//! College repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::college::{College, CreateCollegeRequest};
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, COLLEGE_PREFIX, ID_WIDTH};

#[derive(Clone)]
pub struct CollegeRepository {
    pool: PgPool,
}

impl CollegeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_college_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT college_id FROM colleges")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(COLLEGE_PREFIX, ID_WIDTH, &existing))
    }

    /// Create a college owned by the given admin
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        college_id: &str,
        request: &CreateCollegeRequest,
        owner_admin_id: &str,
    ) -> Result<College, CampusBuddyError> {
        let college = sqlx::query_as::<_, College>(
            r#"
            INSERT INTO colleges (college_id, name, contact_no, email, location, owner_admin_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, college_id, name, contact_no, email, location, owner_admin_id, created_at
            "#,
        )
        .bind(college_id)
        .bind(&request.name)
        .bind(&request.contact_no)
        .bind(&request.email)
        .bind(&request.location)
        .bind(owner_admin_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(college)
    }

    pub async fn find_by_college_id(
        &self,
        college_id: &str,
    ) -> Result<Option<College>, CampusBuddyError> {
        let college = sqlx::query_as::<_, College>(
            "SELECT id, college_id, name, contact_no, email, location, owner_admin_id, created_at FROM colleges WHERE college_id = $1"
        )
        .bind(college_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(college)
    }

    /// Find the college owned by an admin, if any
    pub async fn find_by_owner(
        &self,
        owner_admin_id: &str,
    ) -> Result<Option<College>, CampusBuddyError> {
        let college = sqlx::query_as::<_, College>(
            "SELECT id, college_id, name, contact_no, email, location, owner_admin_id, created_at FROM colleges WHERE owner_admin_id = $1"
        )
        .bind(owner_admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(college)
    }

    pub async fn name_exists_iexact(&self, name: &str) -> Result<bool, CampusBuddyError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM colleges WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }

    /// All colleges for the public portal listing
    pub async fn list_all(&self) -> Result<Vec<College>, CampusBuddyError> {
        let colleges = sqlx::query_as::<_, College>(
            "SELECT id, college_id, name, contact_no, email, location, owner_admin_id, created_at FROM colleges ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(colleges)
    }

    pub async fn count(&self) -> Result<i64, CampusBuddyError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM colleges")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
