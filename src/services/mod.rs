//! Services module
//!
//! This module contains business logic services

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod registration;
pub mod storage;
pub mod ugc;

// Re-export commonly used services
pub use analytics::{engagement_score, AnalyticsService};
pub use auth::AuthService;
pub use catalog::{parse_event_datetime, CatalogService};
pub use registration::RegistrationService;
pub use storage::StorageService;
pub use ugc::UgcService;

use crate::config::settings::Settings;
use crate::config::FeaturesConfig;
use crate::database::{health_check, DatabaseService};
use crate::session::SessionStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub registration_service: RegistrationService,
    pub analytics_service: AnalyticsService,
    pub ugc_service: UgcService,
    pub storage_service: StorageService,
    db: DatabaseService,
    sessions: SessionStore,
    features: FeaturesConfig,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, sessions: SessionStore, settings: Settings) -> Self {
        let storage_service = StorageService::new(settings.media.clone());
        let auth_service = AuthService::new(db.clone(), sessions.clone());
        let catalog_service = CatalogService::new(db.clone());
        let registration_service = RegistrationService::new(db.clone());
        let analytics_service = AnalyticsService::new(db.clone());
        let ugc_service = UgcService::new(
            db.clone(),
            storage_service.clone(),
            settings.features.clone(),
        );

        Self {
            auth_service,
            catalog_service,
            registration_service,
            analytics_service,
            ugc_service,
            storage_service,
            db,
            sessions,
            features: settings.features,
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = health_check(self.db.pool()).await.is_ok();
        let redis_healthy = self.sessions.test_connection().await.is_ok();

        ServiceHealthStatus {
            database_healthy,
            redis_healthy,
            ugc_uploads_enabled: self.features.ugc_uploads,
            analytics_maintenance_enabled: self.features.analytics_maintenance,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub redis_healthy: bool,
    pub ugc_uploads_enabled: bool,
    pub analytics_maintenance_enabled: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy && self.redis_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.redis_healthy {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}
