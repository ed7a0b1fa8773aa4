use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::Listed;

/// Hosted Redis instance as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedisInstance {
    /// Stable instance identifier.
    pub id: String,
    /// Instance name.
    pub name: String,
    /// Namespace owning the instance.
    pub namespace: String,
    /// Number of Redis replicas.
    pub redis_replicas: u32,
    /// Number of Sentinel replicas.
    pub sentinel_replicas: u32,
    /// Status reported by the cluster.
    pub status: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Externally reachable host.
    #[serde(default)]
    pub external_host: Option<String>,
    /// Externally reachable port.
    #[serde(default)]
    pub external_port: Option<u16>,
    /// Ready-made `redis-cli` command line.
    #[serde(default)]
    pub redis_cli: Option<String>,
}

impl Listed for RedisInstance {
    const COLLECTION_KEY: &'static str = "instances";
}
