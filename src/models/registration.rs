//! Registration, invoice and payment models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::Event;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub registration_id: String,
    pub user_id: String,
    pub event_id: String,
    pub payment_status: String,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub invoice_id: String,
    pub registration_id: String,
    pub amount_cents: i64,
    pub issued_date: NaiveDate,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub payment_id: String,
    pub invoice_id: String,
    pub amount_cents: i64,
    pub status: String,
    pub gateway: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub plan: String,
    pub payment_method: String,
    pub pay_now: bool,
}

/// What a registration call produced. On a repeat call the existing chain
/// comes back unchanged with `already_registered` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub registration: Registration,
    pub invoice: Invoice,
    pub payment: Option<Payment>,
    pub already_registered: bool,
}

/// Invoice page context: the whole chain plus the amount to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub registration: Registration,
    pub event: Event,
    pub payment: Option<Payment>,
    pub amount_cents: i64,
}

/// Listing row for "my registrations": the registration joined with its event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationListing {
    pub registration_id: String,
    pub event_id: String,
    pub event_title: String,
    pub event_date: Option<DateTime<Utc>>,
    pub payment_status: String,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl ToString for PaymentStatus {
    fn to_string(&self) -> String {
        match self {
            PaymentStatus::Pending => "pending".to_string(),
            PaymentStatus::Paid => "paid".to_string(),
        }
    }
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// Registration plan with its fixed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    Basic,
    Standard,
    Premium,
}

impl Plan {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(Plan::Basic),
            "standard" => Some(Plan::Standard),
            "premium" => Some(Plan::Premium),
            _ => None,
        }
    }

    pub fn price_cents(&self) -> i64 {
        match self {
            Plan::Basic => 19_900,
            Plan::Standard => 49_900,
            Plan::Premium => 99_900,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Standard => "standard",
            Plan::Premium => "premium",
        }
    }
}

/// Accepted payment gateways, exactly as the payment form offers them.
pub const PAYMENT_GATEWAYS: [&str; 5] = [
    "Google Pay",
    "Credit Card",
    "Axis Bank **** 2875",
    "HDFC Bank **** 4021",
    "CampusBuddy Cards",
];

/// Resolve a user-submitted gateway to its canonical label.
pub fn parse_gateway(s: &str) -> Option<&'static str> {
    let wanted = s.trim().to_lowercase();
    PAYMENT_GATEWAYS
        .iter()
        .find(|g| g.to_lowercase() == wanted)
        .copied()
}
