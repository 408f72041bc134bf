//! Event analytics models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Analytics {
    pub id: i64,
    pub analytics_id: String,
    pub event_id: String,
    pub views: i64,
    pub shares: i64,
    pub engagement_score: i64,
    pub is_popular: bool,
    pub updated_at: DateTime<Utc>,
}

/// Raw aggregates an engagement score is computed from.
#[derive(Debug, Clone, FromRow)]
pub struct EngagementInputs {
    pub ugc_count: i64,
    pub review_count: i64,
    pub avg_rating: f64,
    pub last_ugc_date: Option<NaiveDate>,
    pub last_review_date: Option<NaiveDate>,
}

/// One event's engagement figures as computed by a refresh pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEngagement {
    pub event_id: String,
    pub title: String,
    pub ugc_count: i64,
    pub review_count: i64,
    pub avg_rating: f64,
    pub views: i64,
    pub shares: i64,
    pub engagement_score: i64,
    pub last_activity: Option<NaiveDate>,
    pub is_popular: bool,
}
