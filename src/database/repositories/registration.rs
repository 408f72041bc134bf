//! Registration, invoice and payment repository implementation

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::registration::{Invoice, Payment, Registration, RegistrationListing};
use crate::utils::errors::CampusBuddyError;
use crate::utils::ids::{next_id, ID_WIDTH, INVOICE_PREFIX, PAYMENT_PREFIX, REGISTRATION_PREFIX};

#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_registration_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT registration_id FROM registrations")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(REGISTRATION_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn next_invoice_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT invoice_id FROM invoices")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(INVOICE_PREFIX, ID_WIDTH, &existing))
    }

    pub async fn next_payment_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CampusBuddyError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT payment_id FROM payments")
            .fetch_all(&mut **tx)
            .await?;
        let existing: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        Ok(next_id(PAYMENT_PREFIX, ID_WIDTH, &existing))
    }

    /// Look up the one registration a user holds for an event
    pub async fn find_by_user_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<Option<Registration>, CampusBuddyError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, registration_id, user_id, event_id, payment_status, registration_date FROM registrations WHERE user_id = $1 AND event_id = $2"
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    pub async fn create_registration(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        registration_id: &str,
        user_id: &str,
        event_id: &str,
        payment_status: &str,
        registration_date: NaiveDate,
    ) -> Result<Registration, CampusBuddyError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (registration_id, user_id, event_id, payment_status, registration_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, registration_id, user_id, event_id, payment_status, registration_date
            "#
        )
        .bind(registration_id)
        .bind(user_id)
        .bind(event_id)
        .bind(payment_status)
        .bind(registration_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(registration)
    }

    /// Move a registration to a new payment status
    pub async fn set_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        registration_id: &str,
        payment_status: &str,
    ) -> Result<Registration, CampusBuddyError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET payment_status = $2
            WHERE registration_id = $1
            RETURNING id, registration_id, user_id, event_id, payment_status, registration_date
            "#,
        )
        .bind(registration_id)
        .bind(payment_status)
        .fetch_one(&mut **tx)
        .await?;

        Ok(registration)
    }

    pub async fn find_registration(
        &self,
        registration_id: &str,
    ) -> Result<Option<Registration>, CampusBuddyError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, registration_id, user_id, event_id, payment_status, registration_date FROM registrations WHERE registration_id = $1"
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    pub async fn create_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice_id: &str,
        registration_id: &str,
        amount_cents: i64,
        issued_date: NaiveDate,
        details: Option<&str>,
    ) -> Result<Invoice, CampusBuddyError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_id, registration_id, amount_cents, issued_date, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, invoice_id, registration_id, amount_cents, issued_date, details
            "#,
        )
        .bind(invoice_id)
        .bind(registration_id)
        .bind(amount_cents)
        .bind(issued_date)
        .bind(details)
        .fetch_one(&mut **tx)
        .await?;

        Ok(invoice)
    }

    pub async fn find_invoice(
        &self,
        invoice_id: &str,
    ) -> Result<Option<Invoice>, CampusBuddyError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, invoice_id, registration_id, amount_cents, issued_date, details FROM invoices WHERE invoice_id = $1"
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Each registration carries at most one invoice
    pub async fn find_invoice_by_registration(
        &self,
        registration_id: &str,
    ) -> Result<Option<Invoice>, CampusBuddyError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, invoice_id, registration_id, amount_cents, issued_date, details FROM invoices WHERE registration_id = $1"
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_id: &str,
        invoice_id: &str,
        amount_cents: i64,
        status: &str,
        gateway: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<Payment, CampusBuddyError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (payment_id, invoice_id, amount_cents, status, gateway, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, payment_id, invoice_id, amount_cents, status, gateway, paid_at
            "#,
        )
        .bind(payment_id)
        .bind(invoice_id)
        .bind(amount_cents)
        .bind(status)
        .bind(gateway)
        .bind(paid_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(payment)
    }

    pub async fn find_payment_by_invoice(
        &self,
        invoice_id: &str,
    ) -> Result<Option<Payment>, CampusBuddyError> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, payment_id, invoice_id, amount_cents, status, gateway, paid_at FROM payments WHERE invoice_id = $1"
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// A user's registrations joined with their events, newest first
    pub async fn list_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RegistrationListing>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, RegistrationListing>(
            r#"
            SELECT r.registration_id, r.event_id, e.title AS event_title, e.date_time AS event_date, r.payment_status, r.registration_date
            FROM registrations r
            INNER JOIN events e ON r.event_id = e.event_id
            WHERE r.user_id = $1
            ORDER BY r.registration_date DESC, r.registration_id DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent registrations for the dashboard strip
    pub async fn recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<RegistrationListing>, CampusBuddyError> {
        let rows = sqlx::query_as::<_, RegistrationListing>(
            r#"
            SELECT r.registration_id, r.event_id, e.title AS event_title, e.date_time AS event_date, r.payment_status, r.registration_date
            FROM registrations r
            INNER JOIN events e ON r.event_id = e.event_id
            WHERE r.user_id = $1
            ORDER BY r.registration_date DESC, r.registration_id DESC
            LIMIT $2
            "#
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64, CampusBuddyError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    /// Sum of all recorded payment amounts
    pub async fn total_payments_cents(&self) -> Result<i64, CampusBuddyError> {
        let row: (i64,) = sqlx::query_as("SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
