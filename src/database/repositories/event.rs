//! Event and sponsor repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event::{
    CreateEventRequest, CreateSponsorRequest, Event, EventListing, EventSponsor, Sponsor,
    SponsoredEventRow, UpdateEventRequest,
};
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, EVENT_PREFIX, ID_WIDTH, SPONSOR_PREFIX};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_event_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT event_id FROM events")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(EVENT_PREFIX, ID_WIDTH, &existing))
    }

    /// Create a new event under a college
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
        college_id: &str,
        request: &CreateEventRequest,
        created_by: &str,
    ) -> Result<Event, CampusBuddyError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (event_id, college_id, title, description, date_time, location, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_id, college_id, title, description, date_time, location, created_by, created_at, updated_at
            "#
        )
        .bind(event_id)
        .bind(college_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.date_time)
        .bind(&request.location)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(event)
    }

    pub async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<Event>, CampusBuddyError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, event_id, college_id, title, description, date_time, location, created_by, created_at, updated_at FROM events WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Replace the editable fields of an event
    pub async fn update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
        request: &UpdateEventRequest,
    ) -> Result<Event, CampusBuddyError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                date_time = $4,
                location = $5,
                updated_at = NOW()
            WHERE event_id = $1
            RETURNING id, event_id, college_id, title, description, date_time, location, created_by, created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.date_time)
        .bind(&request.location)
        .fetch_one(&mut **tx)
        .await?;

        Ok(event)
    }

    /// Delete an event, cascades cover the dependent rows
    pub async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
    ) -> Result<(), CampusBuddyError> {
        sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Events of one college, newest first
    pub async fn list_by_college(&self, college_id: &str) -> Result<Vec<Event>, CampusBuddyError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, event_id, college_id, title, description, date_time, location, created_by, created_at, updated_at FROM events WHERE college_id = $1 ORDER BY date_time DESC, title"
        )
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// All events joined with their college name for the public portal
    pub async fn list_public(&self) -> Result<Vec<EventListing>, CampusBuddyError> {
        let events = sqlx::query_as::<_, EventListing>(
            r#"
            SELECT e.event_id, e.title, c.name AS college_name, e.date_time, e.location, e.description
            FROM events e
            INNER JOIN colleges c ON e.college_id = c.college_id
            ORDER BY e.date_time DESC, e.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn count(&self) -> Result<i64, CampusBuddyError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    /// Count events that have at least one sponsor linked
    pub async fn count_sponsored(&self) -> Result<i64, CampusBuddyError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT event_id) FROM event_sponsors")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    pub async fn next_sponsor_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT sponsor_id FROM sponsors")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(SPONSOR_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn create_sponsor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sponsor_id: &str,
        request: &CreateSponsorRequest,
    ) -> Result<Sponsor, CampusBuddyError> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            r#"
            INSERT INTO sponsors (sponsor_id, sponsor_name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sponsor_id, sponsor_name, email, phone
            "#,
        )
        .bind(sponsor_id)
        .bind(&request.sponsor_name)
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_one(&mut **tx)
        .await?;

        Ok(sponsor)
    }

    pub async fn find_sponsor(
        &self,
        sponsor_id: &str,
    ) -> Result<Option<Sponsor>, CampusBuddyError> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            "SELECT id, sponsor_id, sponsor_name, email, phone FROM sponsors WHERE sponsor_id = $1",
        )
        .bind(sponsor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sponsor)
    }

    /// Attach a sponsor to an event
    pub async fn link_sponsor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: &str,
        sponsor_id: &str,
        amount_cents: Option<i64>,
        notes: Option<&str>,
    ) -> Result<EventSponsor, CampusBuddyError> {
        let link = sqlx::query_as::<_, EventSponsor>(
            r#"
            INSERT INTO event_sponsors (event_id, sponsor_id, amount_cents, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, sponsor_id, amount_cents, notes
            "#,
        )
        .bind(event_id)
        .bind(sponsor_id)
        .bind(amount_cents)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        Ok(link)
    }

    pub async fn sponsor_link_exists(
        &self,
        event_id: &str,
        sponsor_id: &str,
    ) -> Result<bool, CampusBuddyError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM event_sponsors WHERE event_id = $1 AND sponsor_id = $2)",
        )
        .bind(event_id)
        .bind(sponsor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    pub async fn list_sponsors(&self) -> Result<Vec<Sponsor>, CampusBuddyError> {
        let sponsors = sqlx::query_as::<_, Sponsor>(
            "SELECT id, sponsor_id, sponsor_name, email, phone FROM sponsors ORDER BY sponsor_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sponsors)
    }

    /// Events backed by one sponsor, with the college name attached
    pub async fn list_sponsored_events(
        &self,
        sponsor_id: &str,
    ) -> Result<Vec<SponsoredEventRow>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, SponsoredEventRow>(
            r#"
            SELECT e.event_id, e.title, c.name AS college_name, es.amount_cents
            FROM event_sponsors es
            INNER JOIN events e ON es.event_id = e.event_id
            INNER JOIN colleges c ON e.college_id = c.college_id
            WHERE es.sponsor_id = $1
            ORDER BY e.date_time DESC, e.title
            "#,
        )
        .bind(sponsor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
