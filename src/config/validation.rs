//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{CampusBuddyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_session_config(&settings.session)?;
    validate_media_config(&settings.media)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusBuddyError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusBuddyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusBuddyError::Config(
            "Redis URL is required".to_string(),
        ));
    }

    if config.prefix.is_empty() {
        return Err(CampusBuddyError::Config(
            "Redis key prefix is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.ttl_seconds == 0 {
        return Err(CampusBuddyError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if config.remember_ttl_seconds < config.ttl_seconds {
        return Err(CampusBuddyError::Config(
            "Remembered session TTL cannot be shorter than the session TTL".to_string(),
        ));
    }

    Ok(())
}

/// Validate media storage configuration
fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    if config.root.is_empty() {
        return Err(CampusBuddyError::Config(
            "Media root directory is required".to_string(),
        ));
    }

    if !config.url_prefix.starts_with('/') {
        return Err(CampusBuddyError::Config(
            "Media URL prefix must start with '/'".to_string(),
        ));
    }

    if config.url_prefix.len() > 1 && config.url_prefix.ends_with('/') {
        return Err(CampusBuddyError::Config(
            "Media URL prefix must not end with '/'".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusBuddyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusBuddyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
