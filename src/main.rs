//! CampusBuddy Event Portal
//!
//! Main application entry point

use anyhow::bail;
use tracing::{error, info, warn};

use CampusBuddy::{
    config::Settings,
    database::{connection::DatabaseConfig, create_pool, run_migrations, DatabaseService},
    services::ServiceFactory,
    session::SessionStore,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging, the guard flushes file output on shutdown
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting CampusBuddy portal core...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = DatabaseConfig::from_settings(&settings.database);
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool);

    // Initialize session store
    info!("Connecting to Redis...");
    let session_store =
        SessionStore::new(settings.redis.clone(), settings.session.clone()).await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(database_service, session_store, settings.clone());

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            error!(issue = %issue, "Service health check failed");
        }
        bail!("service health check failed");
    }
    info!(
        ugc_uploads = health.ugc_uploads_enabled,
        analytics_maintenance = health.analytics_maintenance_enabled,
        "All services healthy"
    );

    // Refresh engagement figures college by college
    if settings.features.analytics_maintenance {
        let colleges = services.catalog_service.colleges_portal().await?;
        info!(colleges = colleges.len(), "Refreshing engagement analytics...");
        for college in &colleges {
            match services
                .analytics_service
                .refresh_college(&college.college_id)
                .await
            {
                Ok(results) => {
                    if let Some(popular) = results.iter().find(|r| r.is_popular) {
                        info!(
                            college_id = %college.college_id,
                            event_id = %popular.event_id,
                            engagement_score = popular.engagement_score,
                            "Popular event updated"
                        );
                    }
                }
                Err(e) => {
                    warn!(college_id = %college.college_id, error = %e, "Analytics refresh failed");
                }
            }
        }
    }

    let stats = services.analytics_service.dashboard_stats().await?;
    info!(stats = %stats, "Portal totals");

    info!("CampusBuddy portal core is ready!");

    Ok(())
}
