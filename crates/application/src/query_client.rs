//! Generic paginated query client shared by every listable resource.

use std::sync::Arc;

use paas_core::{AppError, AppResult};
use paas_domain::{Listed, Page, QueryFilter, with_query};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{ApiRequest, ApiResponse, ApiTransport, SessionStore};

/// Prefix of every API path.
pub const API_PREFIX: &str = "/api";

/// Issues filtered GET requests and decodes paginated envelopes.
///
/// The client keeps no per-call state; ordering between concurrent calls is
/// the caller's concern.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
}

impl QueryClient {
    /// Creates a query client over a transport and the session store.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Returns the session store the client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Returns the canonical request path for `endpoint` and `filter`.
    #[must_use]
    pub fn request_path<F>(endpoint: &str, filter: &F) -> String
    where
        F: QueryFilter + ?Sized,
    {
        with_query(format!("{API_PREFIX}{endpoint}").as_str(), filter)
    }

    /// Fetches one page of `R` from `endpoint`.
    ///
    /// A 401/403 response clears the session before failing with
    /// `AppError::Unauthorized`, whatever session is current by then.
    pub async fn query<R, F>(&self, endpoint: &str, filter: &F) -> AppResult<Page<R>>
    where
        R: Listed,
        F: QueryFilter + ?Sized,
    {
        let path = Self::request_path(endpoint, filter);
        let token = self.session.token();

        let mut request = ApiRequest::get(path.as_str());
        if let Some(token) = token.as_deref() {
            request = request.with_bearer(token);
        }

        let response = self.transport.send(request).await.inspect_err(|error| {
            warn!(path = %path, error = %error, "api request failed without a response");
        })?;

        self.read_page(path.as_str(), response)
    }

    /// Same as [`QueryClient::query`], failing with `AppError::Cancelled` once
    /// `cancel` fires. The in-flight request is dropped at that point.
    pub async fn query_cancellable<R, F>(
        &self,
        endpoint: &str,
        filter: &F,
        cancel: &CancellationToken,
    ) -> AppResult<Page<R>>
    where
        R: Listed,
        F: QueryFilter + ?Sized,
    {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(endpoint, "api request cancelled");
                Err(AppError::Cancelled)
            }
            result = self.query(endpoint, filter) => result,
        }
    }

    fn read_page<R: Listed>(&self, path: &str, response: ApiResponse) -> AppResult<Page<R>> {
        let status = response.status;

        if response.is_credential_rejection() {
            warn!(
                path,
                status = status.as_u16(),
                "api rejected the session credential, clearing session"
            );
            if let Err(error) = self.session.clear_session() {
                warn!(error = %error, "failed to remove persisted session");
            }
            return Err(AppError::Unauthorized(response.error_message()));
        }

        if !status.is_success() {
            let message = response.error_message();
            warn!(path, status = status.as_u16(), message = %message, "api request failed");
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let page = Page::<R>::from_json_slice(&response.body)?;
        debug!(
            path,
            page = page.page(),
            count = page.count(),
            total = page.total(),
            "api page received"
        );

        Ok(page)
    }
}
