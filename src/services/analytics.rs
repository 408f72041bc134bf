//! Event analytics service implementation
//!
//! Counter bumps, the per-college engagement refresh and the portal-wide
//! totals shown on the admin dashboard.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::analytics::{Analytics, EventEngagement};
use crate::utils::errors::{CampusBuddyError, Result};

/// Weighted engagement score for one event.
pub fn engagement_score(
    ugc_count: i64,
    review_count: i64,
    avg_rating: f64,
    views: i64,
    shares: i64,
) -> i64 {
    ugc_count * 3 + review_count * 4 + (avg_rating * 2.0).round() as i64 + views + shares * 2
}

/// Analytics service for engagement tracking
#[derive(Clone)]
pub struct AnalyticsService {
    db: DatabaseService,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Record one view for an event, creating its analytics row on first contact
    pub async fn record_view(&self, event_id: &str) -> Result<Analytics> {
        self.require_event(event_id).await?;

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let bumped = async {
                self.ensure_row(&mut tx, event_id).await?;
                self.db.analytics.increment_views(&mut tx, event_id).await
            }
            .await;

            match bumped {
                Ok(analytics) => {
                    tx.commit().await?;
                    debug!(event_id = event_id, views = analytics.views, "View recorded");
                    return Ok(analytics);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying view bump after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Record one share for an event
    pub async fn record_share(&self, event_id: &str) -> Result<Analytics> {
        self.require_event(event_id).await?;

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let bumped = async {
                self.ensure_row(&mut tx, event_id).await?;
                self.db.analytics.increment_shares(&mut tx, event_id).await
            }
            .await;

            match bumped {
                Ok(analytics) => {
                    tx.commit().await?;
                    debug!(event_id = event_id, shares = analytics.shares, "Share recorded");
                    return Ok(analytics);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying share bump after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Recompute engagement for every event of a college inside one
    /// transaction and crown the single most engaging event. Siblings are
    /// explicitly uncrowned so a refresh never leaves two winners behind.
    pub async fn refresh_college(&self, college_id: &str) -> Result<Vec<EventEngagement>> {
        self.db
            .colleges
            .find_by_college_id(college_id)
            .await?
            .ok_or_else(|| CampusBuddyError::CollegeNotFound {
                college_id: college_id.to_string(),
            })?;

        let mut tx = self.db.begin().await?;
        let events = self.db.analytics.college_events(&mut tx, college_id).await?;

        let mut results = Vec::with_capacity(events.len());
        for (event_id, title) in events {
            let row = self.ensure_row(&mut tx, &event_id).await?;
            let inputs = self.db.analytics.engagement_inputs(&mut tx, &event_id).await?;
            let score = engagement_score(
                inputs.ugc_count,
                inputs.review_count,
                inputs.avg_rating,
                row.views,
                row.shares,
            );
            self.db.analytics.set_score(&mut tx, &event_id, score).await?;

            let last_activity = match (inputs.last_ugc_date, inputs.last_review_date) {
                (Some(ugc), Some(review)) => Some(if review > ugc { review } else { ugc }),
                (ugc, review) => ugc.or(review),
            };

            results.push(EventEngagement {
                event_id,
                title,
                ugc_count: inputs.ugc_count,
                review_count: inputs.review_count,
                avg_rating: inputs.avg_rating,
                views: row.views,
                shares: row.shares,
                engagement_score: score,
                last_activity,
                is_popular: false,
            });
        }

        // Events arrive title-ordered, strict comparison keeps the first on a tie.
        let mut winner: Option<usize> = None;
        for (idx, entry) in results.iter().enumerate() {
            let beats = match winner {
                Some(best) => entry.engagement_score > results[best].engagement_score,
                None => true,
            };
            if beats {
                winner = Some(idx);
            }
        }

        for (idx, entry) in results.iter_mut().enumerate() {
            let crowned = winner == Some(idx);
            self.db
                .analytics
                .set_popular(&mut tx, &entry.event_id, crowned)
                .await?;
            entry.is_popular = crowned;
        }

        tx.commit().await?;
        info!(
            college_id = college_id,
            events = results.len(),
            "Engagement refreshed"
        );
        Ok(results)
    }

    /// Portal-wide totals for the admin dashboard
    pub async fn dashboard_stats(&self) -> Result<serde_json::Value> {
        let total_events = self.db.events.count().await?;
        let total_registrations = self.db.registrations.count().await?;
        let total_payments_cents = self.db.registrations.total_payments_cents().await?;
        let total_sponsored = self.db.events.count_sponsored().await?;
        let total_colleges = self.db.colleges.count().await?;
        let total_users = self.db.users.count().await?;

        Ok(json!({
            "total_events": total_events,
            "total_registrations": total_registrations,
            "total_payments_cents": total_payments_cents,
            "total_sponsored": total_sponsored,
            "total_colleges": total_colleges,
            "total_users": total_users,
        }))
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

    async fn ensure_row(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: &str,
    ) -> Result<Analytics> {
        if let Some(row) = self.db.analytics.find_by_event_tx(tx, event_id).await? {
            return Ok(row);
        }
        let analytics_id = self.db.analytics.next_analytics_id(tx).await?;
        self.db.analytics.create(tx, &analytics_id, event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_score_weights() {
        // 2 uploads, 3 reviews averaging 4.0, 10 views, 5 shares
        assert_eq!(engagement_score(2, 3, 4.0, 10, 5), 46);
    }

    #[test]
    fn test_engagement_score_rounds_the_rating_term() {
        assert_eq!(engagement_score(0, 0, 4.25, 0, 0), 9);
        assert_eq!(engagement_score(0, 0, 4.2, 0, 0), 8);
    }

    #[test]
    fn test_engagement_score_of_a_quiet_event_is_zero() {
        assert_eq!(engagement_score(0, 0, 0.0, 0, 0), 0);
    }
}
