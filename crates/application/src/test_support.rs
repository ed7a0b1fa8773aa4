use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use paas_core::{AppError, AppResult};
use parking_lot::Mutex;

use crate::{ApiRequest, ApiResponse, ApiTransport, KeyValueStorage, SessionStore};

#[derive(Default)]
pub(crate) struct FakeStorage {
    entries: Mutex<HashMap<String, String>>,
    failing_key: Mutex<Option<String>>,
}

impl FakeStorage {
    pub(crate) fn with_entries(entries: &[(&str, &str)]) -> Arc<Self> {
        let storage = Self::default();
        {
            let mut map = storage.entries.lock();
            for (key, value) in entries {
                map.insert((*key).to_owned(), (*value).to_owned());
            }
        }
        Arc::new(storage)
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub(crate) fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock() = Some(key.to_owned());
    }

    fn check_writable(&self, key: &str) -> AppResult<()> {
        if self.failing_key.lock().as_deref() == Some(key) {
            return Err(AppError::Persistence(format!("disk full while writing '{key}'")));
        }
        Ok(())
    }
}

impl KeyValueStorage for FakeStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.check_writable(key)?;
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.check_writable(key)?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: tokio::sync::Mutex<VecDeque<AppResult<ApiResponse>>>,
    pub(crate) requests: tokio::sync::Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn responding(responses: Vec<AppResult<ApiResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: tokio::sync::Mutex::new(responses.into()),
            requests: tokio::sync::Mutex::default(),
        })
    }

    pub(crate) fn json(status: StatusCode, body: serde_json::Value) -> Arc<Self> {
        Self::responding(vec![Ok(ApiResponse::new(status, body.to_string()))])
    }

    pub(crate) async fn sent_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|request| request.path.clone())
            .collect()
    }
}

#[async_trait]
impl ApiTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Network("no scripted response".to_owned())))
    }
}

/// Transport whose requests never complete.
pub(crate) struct StalledTransport;

#[async_trait]
impl ApiTransport for StalledTransport {
    async fn send(&self, _request: ApiRequest) -> AppResult<ApiResponse> {
        std::future::pending().await
    }
}

pub(crate) fn signed_in_store(token: &str) -> Arc<SessionStore> {
    let storage = FakeStorage::with_entries(&[
        ("jwt_token", token),
        ("paas_user", r#"{"email":"ops@example.com","is_admin":true}"#),
    ]);
    let store = Arc::new(SessionStore::new(storage));
    store.initialize();
    store
}

pub(crate) fn empty_envelope(key: &str) -> serde_json::Value {
    let mut envelope = serde_json::json!({ "count": 0, "total": 0, "page": 1 });
    envelope[key] = serde_json::json!([]);
    envelope
}
