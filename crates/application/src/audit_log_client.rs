use paas_core::AppResult;
use paas_domain::{AuditLog, FilterValue, Page, QueryFilter};
use tokio_util::sync::CancellationToken;

use crate::QueryClient;

const AUDIT_LOGS_ENDPOINT: &str = "/audit-logs";

/// Filter accepted by the audit log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Action type such as `delete`; sent as `type`.
    pub action_type: Option<String>,
    /// Restrict the listing to actions performed by admins.
    pub admin_only: Option<bool>,
}

impl QueryFilter for AuditLogFilter {
    fn fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("page", FilterValue::Number(self.page.map(i64::from))),
            ("type", FilterValue::Text(self.action_type.as_deref())),
            ("admin_only", FilterValue::Flag(self.admin_only)),
        ]
    }
}

/// Audit log listing bound to `/audit-logs`.
#[derive(Clone)]
pub struct AuditLogClient {
    query: QueryClient,
}

impl AuditLogClient {
    /// Creates the client.
    #[must_use]
    pub fn new(query: QueryClient) -> Self {
        Self { query }
    }

    /// Lists one page of audit logs.
    pub async fn list(&self, filter: &AuditLogFilter) -> AppResult<Page<AuditLog>> {
        self.query.query(AUDIT_LOGS_ENDPOINT, filter).await
    }

    /// Same as [`AuditLogClient::list`], abandoned once `cancel` fires.
    pub async fn list_cancellable(
        &self,
        filter: &AuditLogFilter,
        cancel: &CancellationToken,
    ) -> AppResult<Page<AuditLog>> {
        self.query
            .query_cancellable(AUDIT_LOGS_ENDPOINT, filter, cancel)
            .await
    }
}
