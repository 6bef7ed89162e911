// Alert endpoints

use tracing::debug;

use super::ApiClient;
use crate::error::Error;
use crate::types::{
    AddUpdateRequest, Alert, CreateAlertRequest, EscalateRequest, ListQuery, Page, ResolveRequest,
};

impl ApiClient {
    /// List alerts visible to the caller, filtered server-side.
    ///
    /// `GET /alerts`
    pub async fn list_alerts(&self, query: &ListQuery) -> Result<Page<Alert>, Error> {
        debug!(?query, "listing alerts");
        self.get_with_query(&["alerts"], query).await
    }

    /// All alerts currently `active`.
    ///
    /// `GET /alerts/active`
    pub async fn active_alerts(&self) -> Result<Vec<Alert>, Error> {
        self.get_list(&["alerts", "active"]).await
    }

    /// `GET /alerts/{id}`
    pub async fn get_alert(&self, id: &str) -> Result<Alert, Error> {
        self.get(&["alerts", id]).await
    }

    /// `POST /alerts`
    pub async fn create_alert(&self, request: &CreateAlertRequest) -> Result<Alert, Error> {
        debug!(title = %request.title, kind = %request.kind, "creating alert");
        self.post(&["alerts"], request).await
    }

    /// Append a progress update to an active alert.
    ///
    /// `POST /alerts/{id}/updates`
    pub async fn add_alert_update(
        &self,
        id: &str,
        request: &AddUpdateRequest,
    ) -> Result<Alert, Error> {
        debug!(id, update_type = %request.update_type, "adding alert update");
        self.post(&["alerts", id, "updates"], request).await
    }

    /// Raise the escalation level of an active alert by one.
    ///
    /// `POST /alerts/{id}/escalate`
    pub async fn escalate_alert(
        &self,
        id: &str,
        request: &EscalateRequest,
    ) -> Result<Alert, Error> {
        debug!(id, "escalating alert");
        self.post(&["alerts", id, "escalate"], request).await
    }

    /// Resolve an active alert. Only its creator may do this.
    ///
    /// `POST /alerts/{id}/resolve`
    pub async fn resolve_alert(&self, id: &str, request: &ResolveRequest) -> Result<Alert, Error> {
        debug!(id, proofs = request.proof_images.len(), "resolving alert");
        self.post(&["alerts", id, "resolve"], request).await
    }
}
