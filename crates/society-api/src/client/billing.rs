// Billing endpoints
//
// Resident views (own bills and payments) and admin operations (all bills,
// analytics, bulk generation, manual payments).

use tracing::debug;

use super::ApiClient;
use crate::error::Error;
use crate::types::{
    Bill, BillingAnalytics, BulkBillRequest, BulkBillResult, ListQuery, ManualPaymentRequest,
    Page, Payment,
};

impl ApiClient {
    /// The caller's bills.
    ///
    /// `GET /billing/bills`
    pub async fn my_bills(&self, query: &ListQuery) -> Result<Page<Bill>, Error> {
        self.get_with_query(&["billing", "bills"], query).await
    }

    /// `GET /billing/bills/{id}`
    pub async fn get_bill(&self, id: &str) -> Result<Bill, Error> {
        self.get(&["billing", "bills", id]).await
    }

    /// The caller's payment history.
    ///
    /// `GET /billing/payments`
    pub async fn my_payments(&self, query: &ListQuery) -> Result<Page<Payment>, Error> {
        self.get_with_query(&["billing", "payments"], query).await
    }

    /// Every bill in the society.
    ///
    /// `GET /billing/admin/bills`
    pub async fn admin_bills(&self, query: &ListQuery) -> Result<Page<Bill>, Error> {
        debug!(?query, "listing all bills");
        self.get_with_query(&["billing", "admin", "bills"], query)
            .await
    }

    /// `GET /billing/admin/analytics`
    pub async fn billing_analytics(&self) -> Result<BillingAnalytics, Error> {
        self.get(&["billing", "admin", "analytics"]).await
    }

    /// Generate one bill per targeted unit.
    ///
    /// `POST /billing/admin/bills/bulk-generate`
    pub async fn generate_bills(&self, request: &BulkBillRequest) -> Result<BulkBillResult, Error> {
        debug!(
            bill_type = %request.bill_type,
            amount = request.amount,
            scope = %request.target.scope,
            "generating bills"
        );
        self.post(&["billing", "admin", "bills", "bulk-generate"], request)
            .await
    }

    /// Record a payment received outside the online flow.
    ///
    /// `POST /billing/admin/payments/manual`
    pub async fn record_manual_payment(
        &self,
        request: &ManualPaymentRequest,
    ) -> Result<Payment, Error> {
        debug!(
            bill = %request.bill_id,
            amount = request.amount,
            method = %request.method,
            "recording payment"
        );
        self.post(&["billing", "admin", "payments", "manual"], request)
            .await
    }
}
