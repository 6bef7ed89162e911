// Parking violation endpoints (admin)

use serde::Serialize;
use tracing::debug;

use super::ApiClient;
use crate::error::Error;
use crate::types::{
    BulkReviewRequest, BulkReviewResult, ExportFormat, ListQuery, Page, ReviewRequest, Violation,
    ViolationStatus,
};

const BASE: [&str; 3] = ["admin", "parking", "violations"];

#[derive(Serialize)]
struct ExportQuery {
    format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ViolationStatus>,
}

fn path<'a>(tail: &[&'a str]) -> Vec<&'a str> {
    BASE.iter().copied().chain(tail.iter().copied()).collect()
}

impl ApiClient {
    /// Every violation, filtered server-side.
    ///
    /// `GET /admin/parking/violations/all`
    pub async fn list_violations(&self, query: &ListQuery) -> Result<Page<Violation>, Error> {
        debug!(?query, "listing violations");
        self.get_with_query(&path(&["all"]), query).await
    }

    /// Violations awaiting review.
    ///
    /// `GET /admin/parking/violations/pending`
    pub async fn pending_violations(&self, query: &ListQuery) -> Result<Page<Violation>, Error> {
        self.get_with_query(&path(&["pending"]), query).await
    }

    /// `PUT /admin/parking/violations/review/{id}`
    pub async fn review_violation(
        &self,
        id: &str,
        request: &ReviewRequest,
    ) -> Result<Violation, Error> {
        debug!(id, action = %request.action, "reviewing violation");
        self.put(&path(&["review", id]), request).await
    }

    /// Apply one action to many violations in a single request.
    ///
    /// `PUT /admin/parking/violations/bulk-review`
    pub async fn bulk_review_violations(
        &self,
        request: &BulkReviewRequest,
    ) -> Result<BulkReviewResult, Error> {
        debug!(
            count = request.violation_ids.len(),
            action = %request.action,
            "bulk reviewing violations"
        );
        self.put(&path(&["bulk-review"]), request).await
    }

    /// Download violations as a file. The body is returned as-is.
    ///
    /// `GET /admin/parking/violations/export?format=..&status=..`
    pub async fn export_violations(
        &self,
        format: ExportFormat,
        status: Option<ViolationStatus>,
    ) -> Result<Vec<u8>, Error> {
        debug!(%format, ?status, "exporting violations");
        self.get_raw(&path(&["export"]), &ExportQuery { format, status })
            .await
    }
}
