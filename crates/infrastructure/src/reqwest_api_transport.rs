use async_trait::async_trait;
use paas_application::{ApiRequest, ApiResponse, ApiTransport};
use paas_core::{AppError, AppResult};
use tracing::debug;
use url::Url;

/// reqwest-backed transport for the console API.
///
/// Timeouts are taken from the supplied client and surface as
/// `AppError::Network` like any other missing response.
pub struct ReqwestApiTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ReqwestApiTransport {
    /// Creates a transport sending requests relative to `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Returns the API origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(format!("{base}{path}").as_str()).map_err(|error| {
            AppError::Internal(format!("invalid api request path '{path}': {error}"))
        })
    }
}

#[async_trait]
impl ApiTransport for ReqwestApiTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let url = self.endpoint(request.path.as_str())?;
        let mut builder = self.http_client.request(request.method.clone(), url);

        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.json_body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| transport_error(&request, &error))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| transport_error(&request, &error))?;

        debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "api response received"
        );

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

fn transport_error(request: &ApiRequest, error: &reqwest::Error) -> AppError {
    if error.is_timeout() {
        return AppError::Network(format!(
            "{} {} timed out: {error}",
            request.method, request.path
        ));
    }

    AppError::Network(format!(
        "{} {} failed without a response: {error}",
        request.method, request.path
    ))
}
