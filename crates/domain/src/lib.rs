//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod instance;
mod page;
mod query;
mod route;
mod service_log;

pub use audit::{AuditActionDetail, AuditActionType, AuditLog};
pub use instance::RedisInstance;
pub use page::{Listed, PAGE_SIZE, Page};
pub use query::{EndpointTemplate, FilterValue, NoFilter, QueryFilter, encode_query, with_query};
pub use route::{NavigationDecision, RouteAccess, RouteDefinition, RouteName, RouteTable};
pub use service_log::{ServiceLog, ServiceLogEventType};
