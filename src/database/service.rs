//! Database service layer
//!
//! This module bundles the repositories behind one handle and owns the pool

use sqlx::{Postgres, Transaction};

use crate::database::{
    AdminRepository, AnalyticsRepository, CollegeRepository, DatabasePool, EventRepository,
    RegistrationRepository, UgcRepository, UserRepository,
};
use crate::utils::errors::CampusBuddyError;

#[derive(Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub admins: AdminRepository,
    pub colleges: CollegeRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub ugc: UgcRepository,
    pub analytics: AnalyticsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            admins: AdminRepository::new(pool.clone()),
            colleges: CollegeRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            ugc: UgcRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Open a transaction for a mutating workflow
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, CampusBuddyError> {
        Ok(self.pool.begin().await?)
    }
}
