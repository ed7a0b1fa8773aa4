use std::sync::Arc;

use paas_application::{
    ApiTransport, AuditLogClient, AuthService, InstanceClient, QueryClient, RouteGuard,
    ServiceLogClient, SessionStore,
};
use paas_core::{AppError, AppResult};
use paas_domain::RouteTable;
use paas_infrastructure::{FileKeyValueStorage, ReqwestApiTransport};

use crate::console_config::ConsoleConfig;

pub struct ConsoleServices {
    pub session: Arc<SessionStore>,
    pub guard: RouteGuard,
    pub auth: AuthService,
    pub instances: InstanceClient,
    pub audit_logs: AuditLogClient,
    pub service_logs: ServiceLogClient,
}

impl ConsoleServices {
    pub fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
        let transport: Arc<dyn ApiTransport> = Arc::new(ReqwestApiTransport::new(
            http_client,
            config.api_url.clone(),
        ));

        let storage = Arc::new(FileKeyValueStorage::open(config.state_path.clone()));
        let session = Arc::new(SessionStore::new(storage));
        session.initialize();

        Ok(Self::with_transport(transport, session))
    }

    pub fn with_transport(transport: Arc<dyn ApiTransport>, session: Arc<SessionStore>) -> Self {
        let query = QueryClient::new(transport.clone(), session.clone());

        Self {
            guard: RouteGuard::new(RouteTable::console()),
            auth: AuthService::new(transport, session.clone()),
            instances: InstanceClient::new(query.clone()),
            audit_logs: AuditLogClient::new(query.clone()),
            service_logs: ServiceLogClient::new(query),
            session,
        }
    }
}
