// ── Society facade ──
//
// The entry point for consumers. Owns the API client and the session,
// exposes typed reads, and routes every write through `Command` so local
// validation and workflow checks happen before any request is sent.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use society_api::types::{
    AddUpdateRequest, Alert, Bill, BillingAnalytics, EscalateRequest, ExportFormat, ListQuery,
    Page, Payment, ResolveRequest, User, UserRef, Violation, ViolationStatus,
};
use society_api::{ApiClient, TokenStore};
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult};
use crate::config::{ClientConfig, DEFAULT_POLL_INTERVAL};
use crate::error::CoreError;
use crate::poller::{AlertBadgePoller, AlertCounts};
use crate::review::{BulkReview, BulkReviewOutcome, review_request};
use crate::session::Session;
use crate::workflow::{self, AlertAction};

pub struct Society {
    client: Arc<ApiClient>,
    session: Session,
    poll_interval: Duration,
}

impl Society {
    /// Build the HTTP client from `config`. Does not contact the server;
    /// call `session().init()` to restore a stored login.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.server.clone(), &config.transport(), tokens)?;
        let mut society = Self::with_client(Arc::new(client));
        society.poll_interval = config.poll_interval;
        Ok(society)
    }

    pub fn with_client(client: Arc<ApiClient>) -> Self {
        Self {
            session: Session::new(Arc::clone(&client)),
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    // ── Alert reads ──────────────────────────────────────────────────

    pub async fn alerts(&self, query: &ListQuery) -> Result<Page<Alert>, CoreError> {
        Ok(self.client.list_alerts(query).await?)
    }

    pub async fn active_alerts(&self) -> Result<Vec<Alert>, CoreError> {
        Ok(self.client.active_alerts().await?)
    }

    pub async fn alert(&self, id: &str) -> Result<Alert, CoreError> {
        Ok(self.client.get_alert(id).await?)
    }

    /// Actions the signed-in user may take on `alert`.
    pub async fn alert_actions(&self, alert: &Alert) -> Result<Vec<AlertAction>, CoreError> {
        let user = self.session.ensure_user().await?;
        Ok(workflow::available_actions(alert, &user))
    }

    /// A page of alerts plus the badge counts, fetched concurrently.
    pub async fn alert_overview(
        &self,
        query: &ListQuery,
    ) -> Result<(Page<Alert>, AlertCounts), CoreError> {
        let (page, active) =
            tokio::join!(self.client.list_alerts(query), self.client.active_alerts());
        let counts = AlertCounts::from_alerts(&active?, Utc::now());
        Ok((page?, counts))
    }

    // ── Parking reads ────────────────────────────────────────────────

    pub async fn violations(&self, query: &ListQuery) -> Result<Page<Violation>, CoreError> {
        Ok(self.client.list_violations(query).await?)
    }

    pub async fn pending_violations(
        &self,
        query: &ListQuery,
    ) -> Result<Page<Violation>, CoreError> {
        Ok(self.client.pending_violations(query).await?)
    }

    pub async fn export_violations(
        &self,
        format: ExportFormat,
        status: Option<ViolationStatus>,
    ) -> Result<Vec<u8>, CoreError> {
        Ok(self.client.export_violations(format, status).await?)
    }

    // ── Billing reads ────────────────────────────────────────────────

    pub async fn my_bills(&self, query: &ListQuery) -> Result<Page<Bill>, CoreError> {
        Ok(self.client.my_bills(query).await?)
    }

    pub async fn bill(&self, id: &str) -> Result<Bill, CoreError> {
        Ok(self.client.get_bill(id).await?)
    }

    pub async fn my_payments(&self, query: &ListQuery) -> Result<Page<Payment>, CoreError> {
        Ok(self.client.my_payments(query).await?)
    }

    pub async fn admin_bills(&self, query: &ListQuery) -> Result<Page<Bill>, CoreError> {
        Ok(self.client.admin_bills(query).await?)
    }

    pub async fn billing_analytics(&self) -> Result<BillingAnalytics, CoreError> {
        Ok(self.client.billing_analytics().await?)
    }

    /// Analytics and a page of all bills, fetched concurrently.
    pub async fn billing_overview(
        &self,
        query: &ListQuery,
    ) -> Result<(BillingAnalytics, Page<Bill>), CoreError> {
        let (analytics, bills) =
            tokio::join!(self.client.billing_analytics(), self.client.admin_bills(query));
        Ok((analytics?, bills?))
    }

    // ── User reads ───────────────────────────────────────────────────

    pub async fn users(&self, query: &ListQuery) -> Result<Page<User>, CoreError> {
        Ok(self.client.list_users(query).await?)
    }

    pub async fn user(&self, id: &str) -> Result<User, CoreError> {
        Ok(self.client.get_user(id).await?)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate and execute a write.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        route_command(self, cmd).await
    }

    // ── Background polling ───────────────────────────────────────────

    /// Start the alert badge poller with the configured interval. The
    /// caller owns it; dropping it stops polling.
    pub fn start_alert_polling(&self) -> AlertBadgePoller {
        AlertBadgePoller::spawn(Arc::clone(&self.client), self.poll_interval)
    }

    /// Fetch an alert and check `action` against it for the session user.
    async fn checked_alert(
        &self,
        id: &str,
        action: AlertAction,
    ) -> Result<(Alert, User), CoreError> {
        let user = self.session.ensure_user().await?;
        let alert = self.alert(id).await?;
        workflow::check_action(&alert, action, &user)?;
        Ok((alert, user))
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(society: &Society, cmd: Command) -> Result<CommandResult, CoreError> {
    let client = &society.client;

    match cmd {
        // ── Alerts ───────────────────────────────────────────────────
        Command::CreateAlert(form) => {
            let now = Utc::now();
            let request = form.validate(now)?;
            let expected = workflow::initial_status(request.scheduled_time, now);
            let alert = client.create_alert(&request).await?;
            if alert.status != expected {
                warn!(
                    alert = %alert.display_id(),
                    %expected,
                    actual = %alert.status,
                    "server chose a different initial status"
                );
            }
            info!(alert = %alert.display_id(), status = %alert.status, "alert created");
            Ok(CommandResult::Alert(Box::new(alert)))
        }
        Command::AddAlertUpdate {
            id,
            message,
            update_type,
        } => {
            let message = workflow::validate_update_message(&message)?;
            society.checked_alert(&id, AlertAction::AddUpdate).await?;
            let alert = client
                .add_alert_update(&id, &AddUpdateRequest { message, update_type })
                .await?;
            Ok(CommandResult::Alert(Box::new(alert)))
        }
        Command::EscalateAlert { id, reason } => {
            let reason = workflow::validate_escalation_reason(&reason)?;
            let (before, user) = society.checked_alert(&id, AlertAction::Escalate).await?;
            let mut after = client
                .escalate_alert(&id, &EscalateRequest { reason: reason.clone() })
                .await?;
            workflow::reconcile_escalation(&before, &mut after);
            if !after.is_escalated() {
                // Echo without the escalation block: derive it locally.
                after.escalation = Some(workflow::next_escalation(
                    before.escalation.as_ref(),
                    &reason,
                    Some(UserRef::Id(user.id)),
                    Utc::now(),
                ));
            }
            info!(
                alert = %after.display_id(),
                level = after.escalation_level(),
                "alert escalated"
            );
            Ok(CommandResult::Alert(Box::new(after)))
        }
        Command::ResolveAlert {
            id,
            notes,
            proof_images,
        } => {
            let resolution_notes = workflow::validate_resolution_notes(&notes)?;
            society.checked_alert(&id, AlertAction::Resolve).await?;
            let alert = client
                .resolve_alert(
                    &id,
                    &ResolveRequest {
                        resolution_notes,
                        proof_images,
                    },
                )
                .await?;
            info!(alert = %alert.display_id(), "alert resolved");
            Ok(CommandResult::Alert(Box::new(alert)))
        }

        // ── Parking ──────────────────────────────────────────────────
        Command::ReviewViolation {
            id,
            action,
            notes,
            fine_amount,
        } => {
            let request = review_request(action, notes, fine_amount)?;
            let violation = client.review_violation(&id, &request).await?;
            Ok(CommandResult::Violation(Box::new(violation)))
        }
        Command::BulkReviewViolations { ids, action, notes } => {
            let review = BulkReview::new(ids, action, notes)?;
            debug!(count = review.ids().len(), %action, "submitting bulk review");
            let result = client
                .bulk_review_violations(&review.into_request())
                .await?;
            let outcome = BulkReviewOutcome::from_result(action, &result);
            info!(successful = outcome.successful, failed = outcome.failed, "bulk review done");
            Ok(CommandResult::BulkReview(outcome))
        }

        // ── Billing ──────────────────────────────────────────────────
        Command::GenerateBills(form) => {
            let request = form.validate()?;
            let result = client.generate_bills(&request).await?;
            info!(generated = result.generated, skipped = result.skipped, "bills generated");
            Ok(CommandResult::BillsGenerated(result))
        }
        Command::RecordPayment(form) => {
            let request = form.validate()?;
            let payment = client.record_manual_payment(&request).await?;
            Ok(CommandResult::Payment(Box::new(payment)))
        }

        // ── Users ────────────────────────────────────────────────────
        Command::UpdateUser { id, form } => {
            let request = form.validate()?;
            let user = client.update_user(&id, &request).await?;
            Ok(CommandResult::User(Box::new(user)))
        }
        Command::DeleteUser { id } => {
            client.delete_user(&id).await?;
            info!(user = %id, "user deleted");
            Ok(CommandResult::Ok)
        }
    }
}
