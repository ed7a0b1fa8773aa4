use paas_core::AppResult;
use paas_domain::{EndpointTemplate, FilterValue, Page, QueryFilter, ServiceLog};
use tokio_util::sync::CancellationToken;

use crate::QueryClient;

const SERVICE_LOGS_ENDPOINT: &str = "/service-logs";
const INSTANCE_SERVICE_LOGS_ENDPOINT: EndpointTemplate =
    EndpointTemplate::new("/instances/{id}/service-logs");

/// Filter accepted by the service log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceLogFilter {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Instance name.
    pub instance: Option<String>,
    /// Instance namespace.
    pub namespace: Option<String>,
}

impl QueryFilter for ServiceLogFilter {
    fn fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("page", FilterValue::Number(self.page.map(i64::from))),
            ("instance", FilterValue::Text(self.instance.as_deref())),
            ("namespace", FilterValue::Text(self.namespace.as_deref())),
        ]
    }
}

/// Filter accepted by the per-instance service log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceServiceLogFilter {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Instance namespace.
    pub namespace: Option<String>,
}

impl QueryFilter for InstanceServiceLogFilter {
    fn fields(&self) -> Vec<(&'static str, FilterValue<'_>)> {
        vec![
            ("page", FilterValue::Number(self.page.map(i64::from))),
            ("namespace", FilterValue::Text(self.namespace.as_deref())),
        ]
    }
}

/// Service log listings, global and scoped to one instance.
#[derive(Clone)]
pub struct ServiceLogClient {
    query: QueryClient,
}

impl ServiceLogClient {
    /// Creates the client.
    #[must_use]
    pub fn new(query: QueryClient) -> Self {
        Self { query }
    }

    /// Lists one page of service logs across instances.
    pub async fn list(&self, filter: &ServiceLogFilter) -> AppResult<Page<ServiceLog>> {
        self.query.query(SERVICE_LOGS_ENDPOINT, filter).await
    }

    /// Same as [`ServiceLogClient::list`], abandoned once `cancel` fires.
    pub async fn list_cancellable(
        &self,
        filter: &ServiceLogFilter,
        cancel: &CancellationToken,
    ) -> AppResult<Page<ServiceLog>> {
        self.query
            .query_cancellable(SERVICE_LOGS_ENDPOINT, filter, cancel)
            .await
    }

    /// Lists one page of service logs for the instance `id`.
    ///
    /// `id` is percent-encoded into the path.
    pub async fn list_for_instance(
        &self,
        id: &str,
        filter: &InstanceServiceLogFilter,
    ) -> AppResult<Page<ServiceLog>> {
        let endpoint = INSTANCE_SERVICE_LOGS_ENDPOINT.render(&[("id", id)])?;
        self.query.query(endpoint.as_str(), filter).await
    }

    /// Same as [`ServiceLogClient::list_for_instance`], abandoned once `cancel`
    /// fires.
    pub async fn list_for_instance_cancellable(
        &self,
        id: &str,
        filter: &InstanceServiceLogFilter,
        cancel: &CancellationToken,
    ) -> AppResult<Page<ServiceLog>> {
        let endpoint = INSTANCE_SERVICE_LOGS_ENDPOINT.render(&[("id", id)])?;
        self.query
            .query_cancellable(endpoint.as_str(), filter, cancel)
            .await
    }
}
