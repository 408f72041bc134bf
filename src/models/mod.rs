//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod admin;
pub mod analytics;
pub mod college;
pub mod credential;
pub mod event;
pub mod registration;
pub mod ugc;
pub mod user;

// Re-export commonly used models
pub use admin::{AdminProfile, AdminRegisterRequest};
pub use analytics::{Analytics, EventEngagement};
pub use college::{College, CreateCollegeRequest};
pub use credential::Credential;
pub use event::{
    CreateEventRequest, CreateSponsorRequest, Event, EventListing, EventSponsor, Sponsor,
    SponsorListing, SponsoredEventRow, UpdateEventRequest,
};
pub use registration::{
    parse_gateway, Invoice, InvoiceDetail, Payment, PaymentStatus, Plan, RegisterRequest,
    Registration, RegistrationListing, RegistrationOutcome, PAYMENT_GATEWAYS,
};
pub use ugc::{
    Photo, PostReviewRequest, PostUgcRequest, Review, ReviewFeedRow, ReviewOwnRow, Ugc,
    UgcContentType, UgcFeedRow, UgcOwnRow, UgcWithPhotos, UploadFile,
};
pub use user::{SignupRequest, UpdateProfileRequest, UserProfile};

/// An authenticated account of either kind.
#[derive(Debug, Clone)]
pub enum Account {
    User(UserProfile),
    Admin(AdminProfile),
}

impl Account {
    /// The public id stored in the session for this account.
    pub fn public_id(&self) -> &str {
        match self {
            Account::User(user) => &user.user_id,
            Account::Admin(admin) => &admin.admin_id,
        }
    }

    /// The name greeted after login.
    pub fn display_name(&self) -> &str {
        match self {
            Account::User(user) => &user.username,
            Account::Admin(admin) => &admin.full_name,
        }
    }
}
