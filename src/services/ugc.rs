//! UGC and review service implementation
//!
//! Event hub posting for photos and text, reviews with the rating clamp,
//! the owner-only delete with best-effort file cleanup, and the per-user
//! listings.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::FeaturesConfig;
use crate::database::DatabaseService;
use crate::models::ugc::{
    EventHub, OwnUgcWithPhotos, PostReviewRequest, PostUgcRequest, Review, ReviewOwnRow, Ugc,
    UgcContentType, UgcWithPhotos,
};
use crate::models::user::UserProfile;
use crate::services::storage::StorageService;
use crate::utils::errors::{CampusBuddyError, Result};
use crate::utils::helpers::{
    clip_chars, generate_random_string, normalize_legacy_image_url, sanitize_filename,
};

const CAPTION_MAX_CHARS: usize = 150;
const COMMENT_MAX_CHARS: usize = 200;
const IMAGE_URL_MAX_CHARS: usize = 255;
const FEED_ITEMS: i64 = 12;
const UPLOAD_SUBDIR: &str = "ugc/photos";
const UPLOAD_TAG_LENGTH: usize = 8;

/// UGC and review service
#[derive(Clone)]
pub struct UgcService {
    db: DatabaseService,
    storage: StorageService,
    features: FeaturesConfig,
}

impl UgcService {
    /// Create a new UgcService instance
    pub fn new(db: DatabaseService, storage: StorageService, features: FeaturesConfig) -> Self {
        Self {
            db,
            storage,
            features,
        }
    }

    /// Post a photo or text entry on an event. Photo posts must carry an
    /// uploaded file or an image URL, the file wins when both are present.
    pub async fn post_ugc(
        &self,
        actor: &UserProfile,
        event_id: &str,
        request: PostUgcRequest,
    ) -> Result<Ugc> {
        self.require_event(event_id).await?;

        let content_type = UgcContentType::parse(&request.content_type).ok_or_else(|| {
            CampusBuddyError::InvalidInput("Please select a valid content type.".to_string())
        })?;

        let caption = request.caption.trim();
        let content_data = if caption.is_empty() {
            None
        } else {
            Some(clip_chars(caption, CAPTION_MAX_CHARS))
        };

        let image_url = match content_type {
            UgcContentType::Photo => Some(self.resolve_photo_url(&request).await?),
            UgcContentType::Text => None,
        };

        let today = Utc::now().date_naive();
        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let ugc_id = self.db.ugc.next_ugc_id(&mut tx).await?;

            let created = async {
                let ugc = self
                    .db
                    .ugc
                    .create_ugc(
                        &mut tx,
                        &ugc_id,
                        content_type.as_str(),
                        content_data.as_deref(),
                        today,
                        &actor.user_id,
                        event_id,
                    )
                    .await?;

                if let Some(url) = &image_url {
                    let photo_id = self.db.ugc.next_photo_id(&mut tx).await?;
                    self.db
                        .ugc
                        .create_photo(&mut tx, &photo_id, url, &actor.user_id, &ugc.ugc_id)
                        .await?;
                }

                Ok::<_, CampusBuddyError>(ugc)
            }
            .await;

            match created {
                Ok(ugc) => {
                    tx.commit().await?;
                    info!(
                        user_id = %actor.user_id,
                        event_id = event_id,
                        ugc_id = %ugc.ugc_id,
                        content_type = content_type.as_str(),
                        "Post created"
                    );
                    return Ok(ugc);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying post after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Post a review on an event. Rating is clamped to 0..=5, a zero rating
    /// without a comment is rejected.
    pub async fn post_review(
        &self,
        actor: &UserProfile,
        event_id: &str,
        request: PostReviewRequest,
    ) -> Result<Review> {
        self.require_event(event_id).await?;

        let rating = request.rating.clamp(0, 5);
        let comment = request.comment.trim();
        if rating == 0 && comment.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Please add a rating or a comment.".to_string(),
            ));
        }
        let comment = if comment.is_empty() {
            None
        } else {
            Some(clip_chars(comment, COMMENT_MAX_CHARS))
        };

        let today = Utc::now().date_naive();
        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let review_id = self.db.ugc.next_review_id(&mut tx).await?;

            match self
                .db
                .ugc
                .create_review(
                    &mut tx,
                    &review_id,
                    &actor.user_id,
                    event_id,
                    rating,
                    comment.as_deref(),
                    today,
                )
                .await
            {
                Ok(review) => {
                    tx.commit().await?;
                    info!(
                        user_id = %actor.user_id,
                        event_id = event_id,
                        review_id = %review.review_id,
                        rating = rating,
                        "Review posted"
                    );
                    return Ok(review);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying review after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Delete one of the user's own posts. Backing files are removed
    /// best-effort, the row delete proceeds either way.
    pub async fn delete_ugc(&self, actor: &UserProfile, ugc_id: &str) -> Result<()> {
        let ugc = self
            .db
            .ugc
            .find_owned(ugc_id, &actor.user_id)
            .await?
            .ok_or_else(|| CampusBuddyError::UgcNotFound {
                ugc_id: ugc_id.to_string(),
            })?;

        let photos = self.db.ugc.photos_for_ugc(&ugc.ugc_id).await?;
        for photo in &photos {
            if let Some(rel_path) = self.storage.strip_media_prefix(&photo.image_url) {
                if let Err(e) = self.storage.delete(rel_path).await {
                    debug!(photo_id = %photo.photo_id, error = %e, "Skipping file cleanup failure");
                }
            }
        }

        let mut tx = self.db.begin().await?;
        self.db.ugc.delete_ugc(&mut tx, &ugc.ugc_id).await?;
        tx.commit().await?;

        info!(
            user_id = %actor.user_id,
            ugc_id = ugc_id,
            photos = photos.len(),
            "Post deleted"
        );
        Ok(())
    }

    /// Event hub context: the event with its latest posts and reviews
    pub async fn event_hub(&self, event_id: &str) -> Result<EventHub> {
        let event = self
            .db
            .events
            .find_by_event_id(event_id)
            .await?
            .ok_or_else(|| CampusBuddyError::EventNotFound {
                event_id: event_id.to_string(),
            })?;

        let feed = self.db.ugc.event_feed(event_id, FEED_ITEMS).await?;
        let mut ugc_list = Vec::with_capacity(feed.len());
        for item in feed {
            let photos = self.db.ugc.photos_for_ugc(&item.ugc_id).await?;
            ugc_list.push(UgcWithPhotos { item, photos });
        }
        let reviews = self.db.ugc.event_reviews(event_id, FEED_ITEMS).await?;

        Ok(EventHub {
            event,
            ugc_list,
            reviews,
        })
    }

    /// A user's own posts with their photos, newest first
    pub async fn my_ugc(&self, actor: &UserProfile) -> Result<Vec<OwnUgcWithPhotos>> {
        let items = self.db.ugc.list_by_user(&actor.user_id).await?;
        let mut listings = Vec::with_capacity(items.len());
        for item in items {
            let photos = self.db.ugc.photos_for_ugc(&item.ugc_id).await?;
            listings.push(OwnUgcWithPhotos { item, photos });
        }

        Ok(listings)
    }

    /// A user's own reviews, newest first
    pub async fn my_reviews(&self, actor: &UserProfile) -> Result<Vec<ReviewOwnRow>> {
        self.db.ugc.reviews_by_user(&actor.user_id).await
    }

    async fn require_event(&self, event_id: &str) -> Result<()> {
        self.db
            .events
            .find_by_event_id(event_id)
            .await?
            .ok_or_else(|| CampusBuddyError::EventNotFound {
                event_id: event_id.to_string(),
            })?;

        Ok(())
    }

    async fn resolve_photo_url(&self, request: &PostUgcRequest) -> Result<String> {
        if let Some(upload) = &request.upload {
            if !self.features.ugc_uploads {
                return Err(CampusBuddyError::InvalidInput(
                    "Photo uploads are currently disabled".to_string(),
                ));
            }
            let path = format!(
                "{}/{}_{}_{}",
                UPLOAD_SUBDIR,
                Utc::now().format("%Y%m%d%H%M%S"),
                generate_random_string(UPLOAD_TAG_LENGTH),
                sanitize_filename(&upload.filename),
            );
            let stored = self.storage.save(&path, &upload.bytes).await?;
            return Ok(clip_chars(
                &self.storage.media_url(&stored),
                IMAGE_URL_MAX_CHARS,
            ));
        }

        let legacy = request.image_url.as_deref().unwrap_or_default();
        match normalize_legacy_image_url(legacy, self.storage.url_prefix())? {
            Some(url) => Ok(clip_chars(&url, IMAGE_URL_MAX_CHARS)),
            None => Err(CampusBuddyError::InvalidInput(
                "A photo post needs an uploaded file or an image URL".to_string(),
            )),
        }
    }
}
