//! UGC, photo and review repository implementation

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::ugc::{
    Photo, Review, ReviewFeedRow, ReviewOwnRow, Ugc, UgcFeedRow, UgcOwnRow,
};
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, ID_WIDTH, PHOTO_PREFIX, REVIEW_PREFIX, UGC_PREFIX};

#[derive(Clone)]
pub struct UgcRepository {
    pool: PgPool,
}

impl UgcRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_ugc_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT ugc_id FROM ugc")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(UGC_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn next_photo_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT photo_id FROM photos")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(PHOTO_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn next_review_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT review_id FROM reviews")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(REVIEW_PREFIX, ID_WIDTH, &existing))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_ugc(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ugc_id: &str,
        content_type: &str,
        content_data: Option<&str>,
        posted_on: NaiveDate,
        user_id: &str,
        event_id: &str,
    ) -> Result<Ugc, CampusBuddyError> {
        let ugc = sqlx::query_as::<_, Ugc>(
            r#"
            INSERT INTO ugc (ugc_id, content_type, content_data, posted_on, user_id, event_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, ugc_id, content_type, content_data, posted_on, user_id, event_id
            "#,
        )
        .bind(ugc_id)
        .bind(content_type)
        .bind(content_data)
        .bind(posted_on)
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ugc)
    }

    pub async fn create_photo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        photo_id: &str,
        image_url: &str,
        uploaded_by: &str,
        ugc_id: &str,
    ) -> Result<Photo, CampusBuddyError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (photo_id, image_url, uploaded_by, ugc_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, photo_id, image_url, uploaded_by, ugc_id
            "#,
        )
        .bind(photo_id)
        .bind(image_url)
        .bind(uploaded_by)
        .bind(ugc_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(photo)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review_id: &str,
        user_id: &str,
        event_id: &str,
        rating: i32,
        comment: Option<&str>,
        date_posted: NaiveDate,
    ) -> Result<Review, CampusBuddyError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (review_id, user_id, event_id, rating, comment, date_posted)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, review_id, user_id, event_id, rating, comment, date_posted
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .bind(event_id)
        .bind(rating)
        .bind(comment)
        .bind(date_posted)
        .fetch_one(&mut **tx)
        .await?;

        Ok(review)
    }

    /// Look up a post only if the given user owns it
    pub async fn find_owned(
        &self,
        ugc_id: &str,
        user_id: &str,
    ) -> Result<Option<Ugc>, CampusBuddyError> {
        let ugc = sqlx::query_as::<_, Ugc>(
            "SELECT id, ugc_id, content_type, content_data, posted_on, user_id, event_id FROM ugc WHERE ugc_id = $1 AND user_id = $2"
        )
        .bind(ugc_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ugc)
    }

    pub async fn photos_for_ugc(&self, ugc_id: &str) -> Result<Vec<Photo>, CampusBuddyError> {
        let photos = sqlx::query_as::<_, Photo>(
            "SELECT id, photo_id, image_url, uploaded_by, ugc_id FROM photos WHERE ugc_id = $1 ORDER BY photo_id"
        )
        .bind(ugc_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    /// Delete a post, photo rows go with it via the cascade
    pub async fn delete_ugc(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ugc_id: &str,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query("DELETE FROM ugc WHERE ugc_id = $1")
            .bind(ugc_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Most recent posts on an event, joined with the author's name
    pub async fn event_feed(
        &self,
        event_id: &str,
        limit: i64,
    ) -> Result<Vec<UgcFeedRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, UgcFeedRow>(
            r#"
            SELECT g.ugc_id, g.content_type, g.content_data, g.posted_on, g.user_id, u.username
            FROM ugc g
            INNER JOIN users u ON g.user_id = u.user_id
            WHERE g.event_id = $1
            ORDER BY g.posted_on DESC, g.ugc_id DESC
            LIMIT $2
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent reviews on an event, joined with the author's name
    pub async fn event_reviews(
        &self,
        event_id: &str,
        limit: i64,
    ) -> Result<Vec<ReviewFeedRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, ReviewFeedRow>(
            r#"
            SELECT r.review_id, r.rating, r.comment, r.date_posted, r.user_id, u.username
            FROM reviews r
            INNER JOIN users u ON r.user_id = u.user_id
            WHERE r.event_id = $1
            ORDER BY r.date_posted DESC, r.review_id DESC
            LIMIT $2
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// A user's own posts, newest first
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<UgcOwnRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, UgcOwnRow>(
            r#"
            SELECT g.ugc_id, g.content_type, g.content_data, g.posted_on, g.event_id, e.title AS event_title
            FROM ugc g
            INNER JOIN events e ON g.event_id = e.event_id
            WHERE g.user_id = $1
            ORDER BY g.posted_on DESC, g.ugc_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent posts for the dashboard strip
    pub async fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<UgcOwnRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, UgcOwnRow>(
            r#"
            SELECT g.ugc_id, g.content_type, g.content_data, g.posted_on, g.event_id, e.title AS event_title
            FROM ugc g
            INNER JOIN events e ON g.event_id = e.event_id
            WHERE g.user_id = $1
            ORDER BY g.posted_on DESC, g.ugc_id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// A user's own reviews, newest first
    pub async fn reviews_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ReviewOwnRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, ReviewOwnRow>(
            r#"
            SELECT r.review_id, r.rating, r.comment, r.date_posted, r.event_id, e.title AS event_title
            FROM reviews r
            INNER JOIN events e ON r.event_id = e.event_id
            WHERE r.user_id = $1
            ORDER BY r.date_posted DESC, r.review_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
