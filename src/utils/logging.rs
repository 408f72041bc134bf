//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the CampusBuddy application.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must stay alive for the lifetime of the process,
/// otherwise buffered file output is lost on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "campusbuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log authentication events with structured data
pub fn log_auth_event(account_id: &str, action: &str, details: Option<&str>) {
    info!(
        account_id = account_id,
        action = action,
        details = details,
        "Authentication event"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: &str, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log completed payments
pub fn log_payment(invoice_id: &str, payment_id: &str, amount_cents: i64, gateway: &str) {
    info!(
        invoice_id = invoice_id,
        payment_id = payment_id,
        amount_cents = amount_cents,
        gateway = gateway,
        "Payment recorded"
    );
}
