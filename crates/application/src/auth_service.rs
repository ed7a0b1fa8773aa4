//! Sign-in and sign-out against the console API.

use std::sync::Arc;

use paas_core::{AppError, AppResult, NonEmptyString};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{ApiRequest, ApiTransport, IdentityPayload, SessionSnapshot, SessionStore};

/// Prefix of the unauthenticated sign-in endpoints.
pub const AUTH_PREFIX: &str = "/auth";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<IdentityPayload>,
}

/// Exchanges credentials for a session and tears sessions down again.
pub struct AuthService {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Signs in and stores the returned session.
    ///
    /// Rejected credentials fail with `AppError::Unauthorized` and leave any
    /// current session alone.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionSnapshot> {
        let email = NonEmptyString::new(email.trim())
            .map_err(|_| AppError::Validation("email must not be empty".to_owned()))?;
        if password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_owned()));
        }

        let request = ApiRequest::post_json(
            format!("{AUTH_PREFIX}/login"),
            serde_json::json!({ "email": email.as_str(), "password": password }),
        );
        let response = self.transport.send(request).await?;

        if response.is_credential_rejection() {
            warn!(email = email.as_str(), "login rejected");
            return Err(AppError::Unauthorized(response.error_message()));
        }

        if !response.status.is_success() {
            return Err(AppError::Api {
                status: response.status.as_u16(),
                message: response.error_message(),
            });
        }

        let body = serde_json::from_slice::<LoginResponse>(&response.body).map_err(|error| {
            AppError::InvalidResponse(format!("login response is malformed: {error}"))
        })?;

        self.session.set_session(body.token, body.user)?;
        info!(email = email.as_str(), "signed in");

        Ok(self.session.snapshot())
    }

    /// Signs out locally; the API keeps no server-side session.
    pub fn logout(&self) -> AppResult<()> {
        self.session.clear_session()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::{Method, StatusCode};
    use paas_core::AppError;

    use crate::SessionStore;
    use crate::test_support::{FakeStorage, FakeTransport, signed_in_store};

    use super::AuthService;

    fn signed_out_store() -> (Arc<FakeStorage>, Arc<SessionStore>) {
        let storage = Arc::new(FakeStorage::default());
        let store = Arc::new(SessionStore::new(storage.clone()));
        (storage, store)
    }

    #[tokio::test]
    async fn login_stores_token_and_identity() {
        let transport = FakeTransport::json(
            StatusCode::OK,
            serde_json::json!({
                "token": "token-1",
                "user": {"email": "ops@example.com", "is_admin": true}
            }),
        );
        let (storage, store) = signed_out_store();
        let service = AuthService::new(transport.clone(), store.clone());

        let snapshot = service.login("ops@example.com", "hunter22").await;

        assert!(snapshot.is_ok_and(|snapshot| snapshot.is_authenticated()));
        assert_eq!(storage.value("jwt_token").as_deref(), Some("token-1"));
        assert!(store.user().is_some_and(|user| user.is_admin()));

        let requests = transport.requests.lock().await;
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/auth/login");
        assert_eq!(requests[0].bearer_token, None);
        assert_eq!(
            requests[0].json_body,
            Some(serde_json::json!({"email": "ops@example.com", "password": "hunter22"}))
        );
    }

    #[tokio::test]
    async fn rejected_credentials_keep_current_session() {
        let transport = FakeTransport::json(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error": "invalid credentials"}),
        );
        let store = signed_in_store("token-1");
        let service = AuthService::new(transport, store.clone());

        let result = service.login("ops@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::Unauthorized(message)) if message == "invalid credentials"));
        assert_eq!(store.token().as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_locally() {
        let transport = FakeTransport::responding(Vec::new());
        let (_, store) = signed_out_store();
        let service = AuthService::new(transport.clone(), store);

        assert!(matches!(
            service.login("  ", "secret").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.login("ops@example.com", "").await,
            Err(AppError::Validation(_))
        ));
        assert!(transport.sent_paths().await.is_empty());
    }

    #[tokio::test]
    async fn server_failure_and_bad_body_are_reported() {
        let transport = FakeTransport::responding(vec![
            Ok(crate::ApiResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                r#"{"error":"database unavailable"}"#,
            )),
            Ok(crate::ApiResponse::new(StatusCode::OK, r#"{"user":null}"#)),
        ]);
        let (_, store) = signed_out_store();
        let service = AuthService::new(transport, store.clone());

        assert!(matches!(
            service.login("ops@example.com", "secret").await,
            Err(AppError::Api { status: 503, .. })
        ));
        assert!(matches!(
            service.login("ops@example.com", "secret").await,
            Err(AppError::InvalidResponse(_))
        ));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let store = signed_in_store("token-1");
        let service = AuthService::new(FakeTransport::responding(Vec::new()), store.clone());

        assert!(service.logout().is_ok());
        assert!(!store.is_authenticated());
    }
}
