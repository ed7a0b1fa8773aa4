use async_trait::async_trait;
use http::{Method, StatusCode};
use paas_core::AppResult;
use serde_json::Value;

/// Outgoing API call, relative to the configured API origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path and query string, e.g. `/api/audit-logs?page=2`.
    pub path: String,
    /// Bearer credential sent in the `Authorization` header.
    pub bearer_token: Option<String>,
    /// JSON request body.
    pub json_body: Option<Value>,
}

impl ApiRequest {
    /// Creates a GET request for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            bearer_token: None,
            json_body: None,
        }
    }

    /// Creates a POST request carrying a JSON body.
    #[must_use]
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            bearer_token: None,
            json_body: Some(body),
        }
    }

    /// Attaches a bearer credential.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Response received from the API, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from status and body bytes.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the server rejected the credential (401 or 403).
    #[must_use]
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    }

    /// Returns the server's error text for a failed response.
    ///
    /// Error bodies look like `{"error": "...", "details": "..."}`. When the
    /// body has no `error` field the canonical status reason is used.
    #[must_use]
    pub fn error_message(&self) -> String {
        let payload = serde_json::from_slice::<Value>(&self.body).ok();
        let field = |name: &str| {
            payload
                .as_ref()
                .and_then(|payload| payload.get(name))
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        match (field("error"), field("details")) {
            (Some(error), Some(details)) => format!("{error}: {details}"),
            (Some(error), None) => error,
            (None, _) => self
                .status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned(),
        }
    }
}

/// Port for sending requests to the console API.
///
/// Implementations return `Ok` for every response that reached the client,
/// including non-success statuses, and `AppError::Network` when none did.
/// They never retry.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the raw response.
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::ApiResponse;

    #[test]
    fn error_message_joins_error_and_details() {
        let response = ApiResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"failed to get audit logs","details":"db timeout"}"#,
        );
        assert_eq!(response.error_message(), "failed to get audit logs: db timeout");
    }

    #[test]
    fn error_message_falls_back_to_status_reason() {
        let response = ApiResponse::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(response.error_message(), "Bad Gateway");
    }

    #[test]
    fn credential_rejection_covers_401_and_403_only() {
        assert!(ApiResponse::new(StatusCode::UNAUTHORIZED, "").is_credential_rejection());
        assert!(ApiResponse::new(StatusCode::FORBIDDEN, "").is_credential_rejection());
        assert!(!ApiResponse::new(StatusCode::NOT_FOUND, "").is_credential_rejection());
    }
}
