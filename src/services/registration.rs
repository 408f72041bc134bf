//! Registration and payment workflow service
//!
//! Drives a registration through pending and paid, with the invoice and
//! payment rows created alongside it. Repeat registrations for the same
//! event return the existing chain instead of duplicating it.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::registration::{
    parse_gateway, Invoice, InvoiceDetail, Payment, PaymentStatus, Plan, Registration,
    RegisterRequest, RegistrationListing, RegistrationOutcome,
};
use crate::models::user::UserProfile;
use crate::utils::errors::{CampusBuddyError, Result};
use crate::utils::logging::log_payment;

/// Registration workflow service
#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Register a user for an event and issue the invoice. With `pay_now`
    /// the payment is recorded in the same transaction and the
    /// registration comes back already paid.
    pub async fn register(
        &self,
        actor: &UserProfile,
        event_id: &str,
        request: RegisterRequest,
    ) -> Result<RegistrationOutcome> {
        let event = self
            .db
            .events
            .find_by_event_id(event_id)
            .await?
            .ok_or_else(|| CampusBuddyError::EventNotFound {
                event_id: event_id.to_string(),
            })?;

        let plan = Plan::parse(&request.plan).ok_or_else(|| {
            CampusBuddyError::InvalidInput(format!("Unknown plan: {}", request.plan))
        })?;
        let gateway = parse_gateway(&request.payment_method).ok_or_else(|| {
            CampusBuddyError::InvalidInput(format!(
                "Unknown payment method: {}",
                request.payment_method
            ))
        })?;

        if let Some(existing) = self
            .db
            .registrations
            .find_by_user_event(&actor.user_id, event_id)
            .await?
        {
            debug!(
                user_id = %actor.user_id,
                event_id = event_id,
                registration_id = %existing.registration_id,
                "Repeat registration, returning the existing chain"
            );
            return self.existing_outcome(existing, plan, &event.title).await;
        }

        let today = Utc::now().date_naive();
        let details = format!("Registration for {}", event.title);

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let registration_id = self.db.registrations.next_registration_id(&mut tx).await?;
            let invoice_id = self.db.registrations.next_invoice_id(&mut tx).await?;

            let created = async {
                let registration = self
                    .db
                    .registrations
                    .create_registration(
                        &mut tx,
                        &registration_id,
                        &actor.user_id,
                        event_id,
                        &PaymentStatus::Pending.to_string(),
                        today,
                    )
                    .await?;
                let invoice = self
                    .db
                    .registrations
                    .create_invoice(
                        &mut tx,
                        &invoice_id,
                        &registration_id,
                        plan.price_cents(),
                        today,
                        Some(&details),
                    )
                    .await?;

                if request.pay_now {
                    let payment_id = self.db.registrations.next_payment_id(&mut tx).await?;
                    let payment = self
                        .db
                        .registrations
                        .create_payment(
                            &mut tx,
                            &payment_id,
                            &invoice_id,
                            invoice.amount_cents,
                            &PaymentStatus::Paid.to_string(),
                            gateway,
                            Utc::now(),
                        )
                        .await?;
                    let registration = self
                        .db
                        .registrations
                        .set_payment_status(
                            &mut tx,
                            &registration_id,
                            &PaymentStatus::Paid.to_string(),
                        )
                        .await?;

                    Ok::<_, CampusBuddyError>((registration, invoice, Some(payment)))
                } else {
                    Ok((registration, invoice, None))
                }
            }
            .await;

            match created {
                Ok((registration, invoice, payment)) => {
                    tx.commit().await?;
                    if let Some(payment) = &payment {
                        log_payment(
                            &invoice.invoice_id,
                            &payment.payment_id,
                            payment.amount_cents,
                            &payment.gateway,
                        );
                    }
                    info!(
                        user_id = %actor.user_id,
                        event_id = event_id,
                        registration_id = %registration.registration_id,
                        payment_status = %registration.payment_status,
                        "Registration created"
                    );
                    return Ok(RegistrationOutcome {
                        registration,
                        invoice,
                        payment,
                        already_registered: false,
                    });
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    // A concurrent call may have won the (user, event) slot.
                    if let Some(existing) = self
                        .db
                        .registrations
                        .find_by_user_event(&actor.user_id, event_id)
                        .await?
                    {
                        return self.existing_outcome(existing, plan, &event.title).await;
                    }
                    warn!(attempt = attempts, "Retrying registration after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Pay a pending invoice. Paying an already paid invoice returns the
    /// recorded payment unchanged.
    pub async fn pay_invoice(
        &self,
        actor: &UserProfile,
        invoice_id: &str,
        payment_method: &str,
    ) -> Result<Payment> {
        let invoice = self.find_invoice(invoice_id).await?;
        let registration = self.find_registration(&invoice.registration_id).await?;
        if registration.user_id != actor.user_id {
            return Err(CampusBuddyError::Unauthorized(
                "You can pay only your own invoices.".to_string(),
            ));
        }
        let gateway = parse_gateway(payment_method).ok_or_else(|| {
            CampusBuddyError::InvalidInput(format!("Unknown payment method: {payment_method}"))
        })?;

        if let Some(payment) = self
            .db
            .registrations
            .find_payment_by_invoice(invoice_id)
            .await?
        {
            debug!(invoice_id = invoice_id, payment_id = %payment.payment_id, "Invoice already paid");
            return Ok(payment);
        }

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let payment_id = self.db.registrations.next_payment_id(&mut tx).await?;

            let created = async {
                let payment = self
                    .db
                    .registrations
                    .create_payment(
                        &mut tx,
                        &payment_id,
                        invoice_id,
                        invoice.amount_cents,
                        &PaymentStatus::Paid.to_string(),
                        gateway,
                        Utc::now(),
                    )
                    .await?;
                self.db
                    .registrations
                    .set_payment_status(
                        &mut tx,
                        &registration.registration_id,
                        &PaymentStatus::Paid.to_string(),
                    )
                    .await?;

                Ok::<_, CampusBuddyError>(payment)
            }
            .await;

            match created {
                Ok(payment) => {
                    tx.commit().await?;
                    log_payment(
                        invoice_id,
                        &payment.payment_id,
                        payment.amount_cents,
                        &payment.gateway,
                    );
                    info!(
                        user_id = %actor.user_id,
                        invoice_id = invoice_id,
                        payment_id = %payment.payment_id,
                        "Invoice paid"
                    );
                    return Ok(payment);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    // A concurrent payment may have landed first.
                    if let Some(payment) = self
                        .db
                        .registrations
                        .find_payment_by_invoice(invoice_id)
                        .await?
                    {
                        return Ok(payment);
                    }
                    warn!(attempt = attempts, "Retrying payment after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Invoice page context. Any signed-in user may open an invoice, the
    /// shown amount prefers the recorded payment over the invoice figure.
    pub async fn invoice_detail(
        &self,
        actor: &UserProfile,
        invoice_id: &str,
    ) -> Result<InvoiceDetail> {
        let invoice = self.find_invoice(invoice_id).await?;
        let registration = self.find_registration(&invoice.registration_id).await?;
        let event = self
            .db
            .events
            .find_by_event_id(&registration.event_id)
            .await?
            .ok_or_else(|| CampusBuddyError::EventNotFound {
                event_id: registration.event_id.clone(),
            })?;
        let payment = self
            .db
            .registrations
            .find_payment_by_invoice(invoice_id)
            .await?;

        debug!(user_id = %actor.user_id, invoice_id = invoice_id, "Invoice viewed");

        let amount_cents = payment
            .as_ref()
            .map(|p| p.amount_cents)
            .unwrap_or(invoice.amount_cents);
        Ok(InvoiceDetail {
            invoice,
            registration,
            event,
            payment,
            amount_cents,
        })
    }

    /// A user's registrations with their events, newest first
    pub async fn my_registrations(
        &self,
        actor: &UserProfile,
    ) -> Result<Vec<RegistrationListing>> {
        self.db.registrations.list_by_user(&actor.user_id).await
    }

    async fn existing_outcome(
        &self,
        registration: Registration,
        plan: Plan,
        event_title: &str,
    ) -> Result<RegistrationOutcome> {
        // Ensure the invoice exists, a registration row is never left without one.
        let invoice = match self
            .db
            .registrations
            .find_invoice_by_registration(&registration.registration_id)
            .await?
        {
            Some(invoice) => invoice,
            None => {
                let details = format!("Registration for {event_title}");
                let mut tx = self.db.begin().await?;
                let invoice_id = self.db.registrations.next_invoice_id(&mut tx).await?;
                let invoice = self
                    .db
                    .registrations
                    .create_invoice(
                        &mut tx,
                        &invoice_id,
                        &registration.registration_id,
                        plan.price_cents(),
                        Utc::now().date_naive(),
                        Some(&details),
                    )
                    .await?;
                tx.commit().await?;
                invoice
            }
        };
        let payment = self
            .db
            .registrations
            .find_payment_by_invoice(&invoice.invoice_id)
            .await?;

        Ok(RegistrationOutcome {
            registration,
            invoice,
            payment,
            already_registered: true,
        })
    }

    async fn find_invoice(&self, invoice_id: &str) -> Result<Invoice> {
        self.db
            .registrations
            .find_invoice(invoice_id)
            .await?
            .ok_or_else(|| CampusBuddyError::InvoiceNotFound {
                invoice_id: invoice_id.to_string(),
            })
    }

    async fn find_registration(&self, registration_id: &str) -> Result<Registration> {
        self.db
            .registrations
            .find_registration(registration_id)
            .await?
            .ok_or_else(|| CampusBuddyError::RegistrationNotFound {
                registration_id: registration_id.to_string(),
            })
    }
}
