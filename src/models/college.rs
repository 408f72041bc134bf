//! College model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct College {
    pub id: i64,
    pub college_id: String,
    pub name: String,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub owner_admin_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollegeRequest {
    pub name: String,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}
