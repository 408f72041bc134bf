//! User-generated content and review models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::Event;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ugc {
    pub id: i64,
    pub ugc_id: String,
    pub content_type: String,
    pub content_data: Option<String>,
    pub posted_on: NaiveDate,
    pub user_id: String,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub photo_id: String,
    pub image_url: String,
    pub uploaded_by: Option<String>,
    pub ugc_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub review_id: String,
    pub user_id: String,
    pub event_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub date_posted: NaiveDate,
}

/// An uploaded file as received from the form layer.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PostUgcRequest {
    pub content_type: String,
    pub caption: String,
    pub upload: Option<UploadFile>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReviewRequest {
    pub rating: i32,
    pub comment: String,
}

/// Feed row for an event hub: a post joined with its author's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UgcFeedRow {
    pub ugc_id: String,
    pub content_type: String,
    pub content_data: Option<String>,
    pub posted_on: NaiveDate,
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UgcWithPhotos {
    pub item: UgcFeedRow,
    pub photos: Vec<Photo>,
}

/// Event hub page context: the event with its latest posts and reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHub {
    pub event: Event,
    pub ugc_list: Vec<UgcWithPhotos>,
    pub reviews: Vec<ReviewFeedRow>,
}

/// Feed row for reviews on an event hub.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewFeedRow {
    pub review_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub date_posted: NaiveDate,
    pub user_id: String,
    pub username: String,
}

/// Listing row for a user's own posts, joined with the event title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UgcOwnRow {
    pub ugc_id: String,
    pub content_type: String,
    pub content_data: Option<String>,
    pub posted_on: NaiveDate,
    pub event_id: String,
    pub event_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnUgcWithPhotos {
    pub item: UgcOwnRow,
    pub photos: Vec<Photo>,
}

/// Listing row for a user's own reviews, joined with the event title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewOwnRow {
    pub review_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub date_posted: NaiveDate,
    pub event_id: String,
    pub event_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UgcContentType {
    Photo,
    Text,
}

impl UgcContentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "photo" => Some(UgcContentType::Photo),
            "text" => Some(UgcContentType::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UgcContentType::Photo => "photo",
            UgcContentType::Text => "text",
        }
    }
}
