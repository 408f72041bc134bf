//! College/event catalog service implementation
//!
//! This service handles admin-side event management with the college
//! ownership gate, the public event and college listings, and sponsors.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::admin::AdminProfile;
use crate::models::college::College;
use crate::models::event::{
    CreateEventRequest, CreateSponsorRequest, Event, EventListing, EventSponsor, Sponsor,
    SponsorListing, UpdateEventRequest,
};
use crate::utils::errors::{CampusBuddyError, Result};
use crate::utils::helpers::{clean_optional, clip_chars, is_valid_email};
use crate::utils::logging::log_admin_action;

const NOTES_MAX_CHARS: usize = 200;

/// Parse the HTML datetime-local form value, "YYYY-MM-DDTHH:MM".
/// Unparseable input yields None, matching the form fallback.
pub fn parse_event_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Catalog service for events, colleges and sponsors
#[derive(Clone)]
pub struct CatalogService {
    db: DatabaseService,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Create an event under the admin's college
    pub async fn create_event(
        &self,
        admin: &AdminProfile,
        request: CreateEventRequest,
    ) -> Result<Event> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Title is required".to_string(),
            ));
        }
        let college = self.owned_college(admin).await?;

        let request = CreateEventRequest {
            title,
            description: clean_optional(request.description),
            date_time: request.date_time,
            location: clean_optional(request.location),
        };

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let event_id = self.db.events.next_event_id(&mut tx).await?;

            match self
                .db
                .events
                .create(&mut tx, &event_id, &college.college_id, &request, &admin.admin_id)
                .await
            {
                Ok(event) => {
                    tx.commit().await?;
                    log_admin_action(&admin.admin_id, "create_event", Some(&event.event_id), None);
                    info!(
                        admin_id = %admin.admin_id,
                        event_id = %event.event_id,
                        college_id = %college.college_id,
                        "Event created"
                    );
                    return Ok(event);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying event creation after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Replace the editable fields of an event of the admin's college
    pub async fn update_event(
        &self,
        admin: &AdminProfile,
        event_id: &str,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.find_event(event_id).await?;
        let college = self.owned_college(admin).await?;
        if event.college_id != college.college_id {
            return Err(CampusBuddyError::Unauthorized(
                "You can edit only your college events.".to_string(),
            ));
        }

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Title is required".to_string(),
            ));
        }
        let request = UpdateEventRequest {
            title,
            description: clean_optional(request.description),
            date_time: request.date_time,
            location: clean_optional(request.location),
        };

        let mut tx = self.db.begin().await?;
        let event = self.db.events.update(&mut tx, event_id, &request).await?;
        tx.commit().await?;

        log_admin_action(&admin.admin_id, "update_event", Some(event_id), None);
        info!(admin_id = %admin.admin_id, event_id = event_id, "Event updated");
        Ok(event)
    }

    /// Delete an event of the admin's college
    pub async fn delete_event(&self, admin: &AdminProfile, event_id: &str) -> Result<()> {
        let event = self.find_event(event_id).await?;
        let college = self.owned_college(admin).await?;
        if event.college_id != college.college_id {
            return Err(CampusBuddyError::Unauthorized(
                "You can delete only your college events.".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        self.db.events.delete(&mut tx, event_id).await?;
        tx.commit().await?;

        log_admin_action(&admin.admin_id, "delete_event", Some(event_id), None);
        info!(admin_id = %admin.admin_id, event_id = event_id, "Event deleted");
        Ok(())
    }

    /// Events of the admin's college, newest first. An admin without a
    /// college manages nothing.
    pub async fn manage_events(&self, admin: &AdminProfile) -> Result<Vec<Event>> {
        match self.db.colleges.find_by_owner(&admin.admin_id).await? {
            Some(college) => self.db.events.list_by_college(&college.college_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// All events with their college names for the public portal
    pub async fn public_events(&self) -> Result<Vec<EventListing>> {
        debug!("Listing public events");
        self.db.events.list_public().await
    }

    /// All colleges, alphabetical
    pub async fn colleges_portal(&self) -> Result<Vec<College>> {
        debug!("Listing colleges");
        self.db.colleges.list_all().await
    }

    /// Register a sponsor
    pub async fn create_sponsor(
        &self,
        admin: &AdminProfile,
        request: CreateSponsorRequest,
    ) -> Result<Sponsor> {
        let sponsor_name = request.sponsor_name.trim().to_string();
        if sponsor_name.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Sponsor name is required".to_string(),
            ));
        }
        let email = clean_optional(request.email);
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(CampusBuddyError::InvalidInput(
                    "Invalid sponsor email".to_string(),
                ));
            }
        }
        let request = CreateSponsorRequest {
            sponsor_name,
            email,
            phone: clean_optional(request.phone),
        };

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let sponsor_id = self.db.events.next_sponsor_id(&mut tx).await?;

            match self
                .db
                .events
                .create_sponsor(&mut tx, &sponsor_id, &request)
                .await
            {
                Ok(sponsor) => {
                    tx.commit().await?;
                    log_admin_action(
                        &admin.admin_id,
                        "create_sponsor",
                        Some(&sponsor.sponsor_id),
                        None,
                    );
                    info!(
                        admin_id = %admin.admin_id,
                        sponsor_id = %sponsor.sponsor_id,
                        "Sponsor created"
                    );
                    return Ok(sponsor);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying sponsor creation after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Attach a sponsor to an event, at most once per pair
    pub async fn link_sponsor(
        &self,
        admin: &AdminProfile,
        event_id: &str,
        sponsor_id: &str,
        amount_cents: Option<i64>,
        notes: Option<&str>,
    ) -> Result<EventSponsor> {
        self.find_event(event_id).await?;
        self.db
            .events
            .find_sponsor(sponsor_id)
            .await?
            .ok_or_else(|| CampusBuddyError::SponsorNotFound {
                sponsor_id: sponsor_id.to_string(),
            })?;
        if self.db.events.sponsor_link_exists(event_id, sponsor_id).await? {
            return Err(CampusBuddyError::InvalidInput(
                "This sponsor is already linked to the event".to_string(),
            ));
        }

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| clip_chars(n, NOTES_MAX_CHARS));

        let mut tx = self.db.begin().await?;
        let link = self
            .db
            .events
            .link_sponsor(&mut tx, event_id, sponsor_id, amount_cents, notes.as_deref())
            .await?;
        tx.commit().await?;

        log_admin_action(&admin.admin_id, "link_sponsor", Some(event_id), Some(sponsor_id));
        info!(
            admin_id = %admin.admin_id,
            event_id = event_id,
            sponsor_id = sponsor_id,
            "Sponsor linked to event"
        );
        Ok(link)
    }

    /// Every sponsor with the events it backs
    pub async fn sponsorship_hub(&self) -> Result<Vec<SponsorListing>> {
        let sponsors = self.db.events.list_sponsors().await?;

        let mut listings = Vec::with_capacity(sponsors.len());
        for sponsor in sponsors {
            let events = self
                .db
                .events
                .list_sponsored_events(&sponsor.sponsor_id)
                .await?;
            listings.push(SponsorListing { sponsor, events });
        }

        Ok(listings)
    }

    async fn find_event(&self, event_id: &str) -> Result<Event> {
        self.db
            .events
            .find_by_event_id(event_id)
            .await?
            .ok_or_else(|| CampusBuddyError::EventNotFound {
                event_id: event_id.to_string(),
            })
    }

    async fn owned_college(&self, admin: &AdminProfile) -> Result<College> {
        self.db
            .colleges
            .find_by_owner(&admin.admin_id)
            .await?
            .ok_or_else(|| CampusBuddyError::CollegeNotFound {
                college_id: admin.admin_id.clone(),
            })
    }
}
