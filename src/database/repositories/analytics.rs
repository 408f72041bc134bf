//! Event analytics repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::analytics::{Analytics, EngagementInputs};
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, ANALYTICS_PREFIX, ID_WIDTH};

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_analytics_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT analytics_id FROM analytics")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(ANALYTICS_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn find_by_event(
        &self,
        event_id: &str,
    ) -> Result<Option<Analytics>, CampusBuddyError> {
        let analytics = sqlx::query_as::<_, Analytics>(
            "SELECT id, analytics_id, event_id, views, shares, engagement_score, is_popular, updated_at FROM analytics WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(analytics)
    }

    /// Transaction-scoped lookup used before a counter bump or refresh write
    pub async fn find_by_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
    ) -> Result<Option<Analytics>, CampusBuddyError> {
        let analytics = sqlx::query_as::<_, Analytics>(
            "SELECT id, analytics_id, event_id, views, shares, engagement_score, is_popular, updated_at FROM analytics WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(analytics)
    }

    /// Create a zeroed analytics row for an event
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        analytics_id: &str,
        event_id: &str,
    ) -> Result<Analytics, CampusBuddyError> {
        let analytics = sqlx::query_as::<_, Analytics>(
            r#"
            INSERT INTO analytics (analytics_id, event_id)
            VALUES ($1, $2)
            RETURNING id, analytics_id, event_id, views, shares, engagement_score, is_popular, updated_at
            "#,
        )
        .bind(analytics_id)
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(analytics)
    }

    pub async fn increment_views(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
    ) -> Result<Analytics, CampusBuddyError> {
        let analytics = sqlx::query_as::<_, Analytics>(
            r#"
            UPDATE analytics
            SET views = views + 1, updated_at = NOW()
            WHERE event_id = $1
            RETURNING id, analytics_id, event_id, views, shares, engagement_score, is_popular, updated_at
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(analytics)
    }

    pub async fn increment_shares(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
    ) -> Result<Analytics, CampusBuddyError> {
        let analytics = sqlx::query_as::<_, Analytics>(
            r#"
            UPDATE analytics
            SET shares = shares + 1, updated_at = NOW()
            WHERE event_id = $1
            RETURNING id, analytics_id, event_id, views, shares, engagement_score, is_popular, updated_at
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(analytics)
    }

    /// Event ids and titles of one college, scanned inside the refresh pass
    pub async fn college_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        college_id: &str,
    ) -> Result<Vec<(String, String)>, CampusBuddyError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT event_id, title FROM events WHERE college_id = $1 ORDER BY title, event_id",
        )
        .bind(college_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows)
    }

    /// Aggregate the UGC and review figures an engagement score is built from
    pub async fn engagement_inputs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
    ) -> Result<EngagementInputs, CampusBuddyError> {
        let inputs = sqlx::query_as::<_, EngagementInputs>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM ugc WHERE event_id = $1) AS ugc_count,
                (SELECT COUNT(*) FROM reviews WHERE event_id = $1) AS review_count,
                (SELECT COALESCE(AVG(rating)::float8, 0) FROM reviews WHERE event_id = $1) AS avg_rating,
                (SELECT MAX(posted_on) FROM ugc WHERE event_id = $1) AS last_ugc_date,
                (SELECT MAX(date_posted) FROM reviews WHERE event_id = $1) AS last_review_date
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(inputs)
    }

    pub async fn set_score(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
        engagement_score: i64,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query(
            "UPDATE analytics SET engagement_score = $2, updated_at = NOW() WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(engagement_score)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn set_popular(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
        is_popular: bool,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query(
            "UPDATE analytics SET is_popular = $2, updated_at = NOW() WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(is_popular)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
