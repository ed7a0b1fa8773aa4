//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_log_client;
mod auth_service;
mod instance_client;
mod listing_view;
mod query_client;
mod route_guard;
mod service_log_client;
mod session_store;
mod storage_ports;
mod transport_ports;

#[cfg(test)]
mod test_support;

pub use audit_log_client::{AuditLogClient, AuditLogFilter};
pub use auth_service::{AUTH_PREFIX, AuthService};
pub use instance_client::InstanceClient;
pub use listing_view::{ListingView, RequestTicket, ViewUpdate};
pub use query_client::{API_PREFIX, QueryClient};
pub use route_guard::RouteGuard;
pub use service_log_client::{InstanceServiceLogFilter, ServiceLogClient, ServiceLogFilter};
pub use session_store::{
    AuthenticationState, IdentityPayload, SessionSnapshot, SessionStore, TOKEN_STORAGE_KEY,
    USER_STORAGE_KEY,
};
pub use storage_ports::KeyValueStorage;
pub use transport_ports::{ApiRequest, ApiResponse, ApiTransport};
