use paas_core::AppResult;
use paas_domain::{NoFilter, Page, RedisInstance};
use tokio_util::sync::CancellationToken;

use crate::QueryClient;

const INSTANCES_ENDPOINT: &str = "/instances";

/// Instance listing bound to `/instances`.
#[derive(Clone)]
pub struct InstanceClient {
    query: QueryClient,
}

impl InstanceClient {
    /// Creates the client.
    #[must_use]
    pub fn new(query: QueryClient) -> Self {
        Self { query }
    }

    /// Lists the instances visible to the signed-in user.
    pub async fn list(&self) -> AppResult<Page<RedisInstance>> {
        self.query.query(INSTANCES_ENDPOINT, &NoFilter).await
    }

    /// Same as [`InstanceClient::list`], abandoned once `cancel` fires.
    pub async fn list_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> AppResult<Page<RedisInstance>> {
        self.query
            .query_cancellable(INSTANCES_ENDPOINT, &NoFilter, cancel)
            .await
    }
}
