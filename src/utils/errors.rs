//! Error handling for CampusBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for CampusBuddy application
#[derive(Error, Debug)]
pub enum CampusBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Admin not found: {admin_id}")]
    AdminNotFound { admin_id: String },

    #[error("College not found: {college_id}")]
    CollegeNotFound { college_id: String },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: String },

    #[error("Invoice not found: {invoice_id}")]
    InvoiceNotFound { invoice_id: String },

    #[error("Sponsor not found: {sponsor_id}")]
    SponsorNotFound { sponsor_id: String },

    #[error("Content not found: {ugc_id}")]
    UgcNotFound { ugc_id: String },

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Result type alias for CampusBuddy operations
pub type Result<T> = std::result::Result<T, CampusBuddyError>;

impl CampusBuddyError {
    /// Check whether the error belongs to the workflow taxonomy that is
    /// reported back to the account holder rather than treated as a fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CampusBuddyError::UserNotFound { .. }
                | CampusBuddyError::AdminNotFound { .. }
                | CampusBuddyError::CollegeNotFound { .. }
                | CampusBuddyError::EventNotFound { .. }
                | CampusBuddyError::RegistrationNotFound { .. }
                | CampusBuddyError::InvoiceNotFound { .. }
                | CampusBuddyError::SponsorNotFound { .. }
                | CampusBuddyError::UgcNotFound { .. }
                | CampusBuddyError::InvalidCredential
                | CampusBuddyError::InvalidInput(_)
                | CampusBuddyError::Conflict(_)
                | CampusBuddyError::Unauthorized(_)
                | CampusBuddyError::UrlParse(_)
        )
    }

    /// Message shown to the account holder for workflow errors.
    /// Infrastructure errors get a generic line and keep details in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CampusBuddyError::UserNotFound { .. }
            | CampusBuddyError::AdminNotFound { .. }
            | CampusBuddyError::InvalidCredential => "Invalid credentials".to_string(),
            CampusBuddyError::CollegeNotFound { .. } => "College not found".to_string(),
            CampusBuddyError::EventNotFound { .. } => "Event not found".to_string(),
            CampusBuddyError::RegistrationNotFound { .. } => "Registration not found".to_string(),
            CampusBuddyError::InvoiceNotFound { .. } => "Invoice not found".to_string(),
            CampusBuddyError::SponsorNotFound { .. } => "Sponsor not found".to_string(),
            CampusBuddyError::UgcNotFound { .. } => "Content not found".to_string(),
            CampusBuddyError::InvalidInput(msg) => msg.clone(),
            CampusBuddyError::Conflict(msg) => msg.clone(),
            CampusBuddyError::Unauthorized(msg) => msg.clone(),
            // The only URL parsing in the crate is of user-supplied image links.
            CampusBuddyError::UrlParse(_) => "Invalid image URL".to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }

    /// Check whether the underlying database error is a unique-constraint
    /// violation. Creation workflows use this to re-run the transaction with
    /// freshly scanned sequential ids.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CampusBuddyError::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_unique_violation()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(CampusBuddyError::InvalidCredential.is_user_error());
        assert!(CampusBuddyError::EventNotFound {
            event_id: "EVT0001".to_string()
        }
        .is_user_error());
        assert!(CampusBuddyError::Unauthorized("nope".to_string()).is_user_error());
        assert!(!CampusBuddyError::Config("bad".to_string()).is_user_error());
        assert!(!CampusBuddyError::PasswordHash("bad".to_string()).is_user_error());
    }

    #[test]
    fn test_user_message_masks_account_probing() {
        // A missing account and a wrong password must read the same.
        let missing = CampusBuddyError::UserNotFound {
            user_id: "nosuch".to_string(),
        };
        let wrong = CampusBuddyError::InvalidCredential;
        assert_eq!(missing.user_message(), wrong.user_message());
    }

    #[test]
    fn test_user_message_passes_through_input_errors() {
        let err = CampusBuddyError::InvalidInput("Email already registered".to_string());
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_unique_violation_on_non_database_error() {
        assert!(!CampusBuddyError::InvalidCredential.is_unique_violation());
        assert!(!CampusBuddyError::Conflict("dup".to_string()).is_unique_violation());
    }
}
