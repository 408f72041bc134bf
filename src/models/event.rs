//! Event and sponsor models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub event_id: String,
    pub college_id: String,
    pub title: String,
    pub description: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Edits replace the whole editable field set, matching the edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Public listing row: an event joined with its college name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventListing {
    pub event_id: String,
    pub title: String,
    pub college_name: String,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub id: i64,
    pub sponsor_id: String,
    pub sponsor_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSponsorRequest {
    pub sponsor_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventSponsor {
    pub id: i64,
    pub event_id: String,
    pub sponsor_id: String,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
}

/// Sponsorship hub row: one sponsor with the events it backs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SponsorListing {
    pub sponsor: Sponsor,
    pub events: Vec<SponsoredEventRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SponsoredEventRow {
    pub event_id: String,
    pub title: String,
    pub college_name: String,
    pub amount_cents: Option<i64>,
}
