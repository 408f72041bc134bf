//! Admin account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminProfile {
    pub id: i64,
    pub admin_id: String,
    pub full_name: String,
    pub admin_name: String,
    pub contact_no: String,
    pub email: String,
    pub gender: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Combined admin and college signup. The two rows are created together;
/// an admin never exists without its college.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRegisterRequest {
    pub full_name: String,
    pub admin_name: String,
    pub contact_no: String,
    pub email: String,
    pub gender: String,
    pub password: String,
    pub college_name: String,
    pub college_contact_no: Option<String>,
    pub college_email: Option<String>,
    pub college_location: Option<String>,
}
