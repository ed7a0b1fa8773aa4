use std::str::FromStr;

use chrono::{DateTime, Utc};
use paas_core::AppError;
use serde::{Deserialize, Serialize};

use crate::page::Listed;

/// Action block recorded with an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditActionDetail {
    /// Action identifier such as `create` or `login`.
    pub action: String,
    /// Name of the affected instance, empty for account actions.
    #[serde(default)]
    pub name: String,
    /// Namespace of the affected instance.
    #[serde(default)]
    pub namespace: String,
    /// Free-form detail message.
    #[serde(default)]
    pub details: Option<String>,
}

/// Server-issued audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Stable entry identifier.
    pub id: String,
    /// Email of the acting user.
    pub user_email: String,
    /// Recorded action.
    pub action: AuditActionDetail,
    /// Whether the entry is only visible to admins.
    #[serde(default)]
    pub admin_info: bool,
    /// Time the action happened.
    pub timestamp: DateTime<Utc>,
    /// HTTP method of the originating request.
    #[serde(default)]
    pub request_method: Option<String>,
    /// HTTP path of the originating request.
    #[serde(default)]
    pub request_path: Option<String>,
    /// Client address of the originating request.
    #[serde(default)]
    pub client_ip: Option<String>,
    /// User agent of the originating request.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Listed for AuditLog {
    const COLLECTION_KEY: &'static str = "audit_logs";
}

/// Audit action values accepted by the `type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditActionType {
    /// Instance creation.
    Create,
    /// Instance update.
    Update,
    /// Instance deletion.
    Delete,
    /// User sign-in.
    Login,
    /// User registration.
    Register,
}

impl AuditActionType {
    /// Returns the filter value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    /// Returns all known action types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditActionType] = &[
            AuditActionType::Create,
            AuditActionType::Update,
            AuditActionType::Delete,
            AuditActionType::Login,
            AuditActionType::Register,
        ];

        ALL
    }
}

impl FromStr for AuditActionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            _ => Err(AppError::Validation(format!(
                "unknown audit action type '{value}'"
            ))),
        }
    }
}
