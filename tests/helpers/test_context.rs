//! Test context helper
//!
//! Bundles a test database with portal settings and hands out services
//! wired against it. Media lands in a per-context temp directory. Only the
//! auth helpers touch Redis (`TEST_REDIS_URL`, default localhost), so
//! suites that skip them run against Postgres alone.

use tempfile::TempDir;

use CampusBuddy::config::Settings;
use CampusBuddy::database::DatabaseService;
use CampusBuddy::services::{
    AnalyticsService, AuthService, CatalogService, RegistrationService, ServiceFactory,
    StorageService, UgcService,
};
use CampusBuddy::session::SessionStore;

use super::database_helper::TestDatabase;

type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Knobs for contexts that stray from the defaults
pub struct TestConfig {
    pub run_migrations: bool,
    pub ugc_uploads: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            run_migrations: true,
            ugc_uploads: true,
        }
    }
}

/// One test's database, settings and media directory
pub struct TestContext {
    pub database: TestDatabase,
    pub settings: Settings,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> TestResult<Self> {
        Self::new_with_config(TestConfig::default()).await
    }

    pub async fn new_with_config(config: TestConfig) -> TestResult<Self> {
        let database = TestDatabase::new_with_migrations(config.run_migrations).await?;
        let temp_dir = TempDir::new()?;
        let settings = create_test_settings(&database, &temp_dir, &config);

        Ok(Self {
            database,
            settings,
            temp_dir,
        })
    }

    pub fn database_service(&self) -> DatabaseService {
        DatabaseService::new(self.database.pool.clone())
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.database_service())
    }

    pub fn registration_service(&self) -> RegistrationService {
        RegistrationService::new(self.database_service())
    }

    pub fn analytics_service(&self) -> AnalyticsService {
        AnalyticsService::new(self.database_service())
    }

    pub fn storage_service(&self) -> StorageService {
        StorageService::new(self.settings.media.clone())
    }

    pub fn ugc_service(&self) -> UgcService {
        UgcService::new(
            self.database_service(),
            self.storage_service(),
            self.settings.features.clone(),
        )
    }

    /// Auth needs the session store, which connects to Redis up front
    pub async fn auth_service(&self) -> TestResult<AuthService> {
        let sessions =
            SessionStore::new(self.settings.redis.clone(), self.settings.session.clone()).await?;
        Ok(AuthService::new(self.database_service(), sessions))
    }

    /// The full factory, as main() builds it
    pub async fn create_services(&self) -> TestResult<ServiceFactory> {
        let sessions =
            SessionStore::new(self.settings.redis.clone(), self.settings.session.clone()).await?;
        Ok(ServiceFactory::new(
            self.database_service(),
            sessions,
            self.settings.clone(),
        ))
    }

    pub async fn load_fixtures(&self) -> TestResult<()> {
        self.database.load_fixtures().await?;
        Ok(())
    }

    pub async fn cleanup(&self) -> TestResult<()> {
        self.database.cleanup().await?;
        Ok(())
    }
}

fn create_test_settings(database: &TestDatabase, temp_dir: &TempDir, config: &TestConfig) -> Settings {
    let mut settings = Settings::default();

    settings.database.url = database.database_url.clone();
    settings.database.max_connections = 5;
    settings.database.min_connections = 1;

    settings.redis.url = std::env::var("TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://localhost:6379".to_string());
    settings.redis.prefix = "test_campusbuddy:".to_string();
    settings.session.ttl_seconds = 300;
    settings.session.remember_ttl_seconds = 600;

    settings.media.root = temp_dir
        .path()
        .join("media")
        .to_string_lossy()
        .into_owned();
    settings.logging.level = "debug".to_string();
    settings.logging.file_path = temp_dir
        .path()
        .join("logs")
        .to_string_lossy()
        .into_owned();

    settings.features.ugc_uploads = config.ugc_uploads;
    settings.features.analytics_maintenance = false;

    settings
}

/// A fresh context over an emptied database, the usual test opener
pub async fn setup_clean_context() -> TestContext {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    ctx.cleanup().await.expect("Failed to clean test database");
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_context_creation() {
        let ctx = TestContext::new().await.expect("Failed to create test context");
        assert!(ctx.settings.database.url.contains("test_campusbuddy") || ctx.settings.database.url.contains("postgres"));
        assert_eq!(ctx.settings.session.ttl_seconds, 300);
        assert!(ctx.settings.features.ugc_uploads);
        assert!(ctx.temp_dir.path().exists());
    }

    #[tokio::test]
    #[serial]
    async fn test_context_with_uploads_disabled() {
        let ctx = TestContext::new_with_config(TestConfig {
            ugc_uploads: false,
            ..TestConfig::default()
        })
        .await
        .expect("Failed to create test context");
        assert!(!ctx.settings.features.ugc_uploads);
    }
}
