//! Caller-side state for one listing screen.
//!
//! The query client keeps no per-call state, so a screen that refreshes one
//! listing repeatedly (filter changes, polling) owns the sequencing. Queries
//! for the same view may complete out of order. Only the result of the most
//! recently issued request is applied, and a failed refresh keeps the
//! previously shown page visible next to a notice.

use std::future::Future;

use paas_core::{AppError, AppResult};
use paas_domain::Page;
use parking_lot::Mutex;
use tracing::debug;

/// Sequence number handed out when a request for the view is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Outcome of completing a request against the view.
#[derive(Debug)]
pub enum ViewUpdate {
    /// The page replaced the shown one.
    Applied,
    /// A newer request was issued meanwhile; the result was dropped.
    Superseded,
    /// The request was cancelled; the view is unchanged.
    Cancelled,
    /// The request failed; the previous page stays visible.
    Failed(AppError),
}

struct ViewState<T> {
    issued: u64,
    settled: u64,
    page: Option<Page<T>>,
    notice: Option<String>,
}

/// Listing state with latest-request-wins sequencing.
pub struct ListingView<T> {
    state: Mutex<ViewState<T>>,
}

impl<T> ListingView<T> {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ViewState {
                issued: 0,
                settled: 0,
                page: None,
                notice: None,
            }),
        }
    }

    /// Registers a new request and returns its ticket.
    pub fn begin(&self) -> RequestTicket {
        let mut state = self.state.lock();
        state.issued += 1;
        RequestTicket(state.issued)
    }

    /// Applies `result` if `ticket` is still the latest issued request.
    pub fn complete(&self, ticket: RequestTicket, result: AppResult<Page<T>>) -> ViewUpdate {
        let mut state = self.state.lock();
        if ticket.0 != state.issued {
            debug!(ticket = ticket.0, latest = state.issued, "dropping superseded result");
            return ViewUpdate::Superseded;
        }
        state.settled = ticket.0;

        match result {
            Ok(page) => {
                state.page = Some(page);
                state.notice = None;
                ViewUpdate::Applied
            }
            Err(AppError::Cancelled) => ViewUpdate::Cancelled,
            Err(error) => {
                state.notice = Some(error.to_string());
                ViewUpdate::Failed(error)
            }
        }
    }

    /// Issues a request, awaits `fetch`, and completes it.
    pub async fn refresh<F>(&self, fetch: F) -> ViewUpdate
    where
        F: Future<Output = AppResult<Page<T>>>,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.complete(ticket, result)
    }

    /// Returns whether the latest request is still outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        let state = self.state.lock();
        state.settled < state.issued
    }

    /// Returns the message of the last failed refresh, if it was not followed
    /// by a successful one.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.state.lock().notice.clone()
    }

    /// Returns a copy of the shown page.
    #[must_use]
    pub fn page(&self) -> Option<Page<T>>
    where
        T: Clone,
    {
        self.state.lock().page.clone()
    }
}

impl<T> Default for ListingView<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use http::StatusCode;
    use paas_core::{AppError, AppResult};
    use paas_domain::{Page, ServiceLog};
    use tokio::sync::Notify;

    use crate::test_support::signed_in_store;
    use crate::{
        ApiRequest, ApiResponse, ApiTransport, QueryClient, ServiceLogClient, ServiceLogFilter,
    };

    use super::{ListingView, ViewUpdate};

    /// Holds back the response for `slow_path` until released.
    struct HeldBackTransport {
        slow_path: &'static str,
        release: Notify,
    }

    #[async_trait]
    impl ApiTransport for HeldBackTransport {
        async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
            let instance = if request.path == self.slow_path {
                self.release.notified().await;
                "cache-old"
            } else {
                "cache-new"
            };

            let body = serde_json::json!({
                "service_logs": [{
                    "id": instance,
                    "instance_name": instance,
                    "namespace": "team-a",
                    "event_type": "failure",
                    "to_status": "Failed",
                    "message": "sentinel lost quorum",
                    "timestamp": "2025-03-01T10:15:00Z"
                }],
                "count": 1,
                "total": 1,
                "page": 1
            });
            Ok(ApiResponse::new(StatusCode::OK, body.to_string()))
        }
    }

    fn page_of(items: &[&str], page: u64) -> AppResult<Page<String>> {
        let items = items.iter().map(|item| (*item).to_owned()).collect::<Vec<_>>();
        let count = items.len() as u64;
        Page::new(items, count, count + (page - 1) * 50, page)
    }

    #[test]
    fn later_request_wins_over_slower_earlier_one() {
        let view = ListingView::new();
        let first = view.begin();
        let second = view.begin();

        assert!(matches!(
            view.complete(second, page_of(&["b"], 2)),
            ViewUpdate::Applied
        ));
        assert!(matches!(
            view.complete(first, page_of(&["a"], 1)),
            ViewUpdate::Superseded
        ));
        assert!(view.page().is_some_and(|page| page.items() == ["b".to_owned()]));
    }

    #[test]
    fn pending_newer_request_blocks_older_result() {
        let view = ListingView::new();
        let first = view.begin();
        let _second = view.begin();

        assert!(matches!(
            view.complete(first, page_of(&["a"], 1)),
            ViewUpdate::Superseded
        ));
        assert!(view.page().is_none());
        assert!(view.is_loading());
    }

    #[test]
    fn failure_keeps_stale_page_and_sets_notice() {
        let view = ListingView::new();
        let ticket = view.begin();
        assert!(matches!(
            view.complete(ticket, page_of(&["a"], 1)),
            ViewUpdate::Applied
        ));

        let ticket = view.begin();
        let update = view.complete(
            ticket,
            Err(AppError::Network("connection reset".to_owned())),
        );

        assert!(matches!(update, ViewUpdate::Failed(AppError::Network(_))));
        assert!(view.page().is_some_and(|page| page.count() == 1));
        assert!(view.notice().is_some_and(|notice| notice.contains("connection reset")));
        assert!(!view.is_loading());

        let ticket = view.begin();
        assert!(matches!(
            view.complete(ticket, page_of(&["a", "b"], 1)),
            ViewUpdate::Applied
        ));
        assert!(view.notice().is_none());
    }

    #[test]
    fn cancellation_changes_nothing() {
        let view = ListingView::<String>::new();
        let ticket = view.begin();

        assert!(matches!(
            view.complete(ticket, Err(AppError::Cancelled)),
            ViewUpdate::Cancelled
        ));
        assert!(view.notice().is_none());
        assert!(view.page().is_none());
    }

    #[tokio::test]
    async fn refresh_applies_awaited_result() {
        let view = ListingView::new();

        let update = view.refresh(async { page_of(&["a"], 1) }).await;

        assert!(matches!(update, ViewUpdate::Applied));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn slow_first_listing_does_not_overwrite_newer_filter() {
        let transport = std::sync::Arc::new(HeldBackTransport {
            slow_path: "/api/service-logs?instance=cache-old",
            release: Notify::new(),
        });
        let client = ServiceLogClient::new(QueryClient::new(
            transport.clone(),
            signed_in_store("token-1"),
        ));
        let view = ListingView::<ServiceLog>::new();
        let old_filter = ServiceLogFilter {
            instance: Some("cache-old".to_owned()),
            ..ServiceLogFilter::default()
        };
        let new_filter = ServiceLogFilter {
            instance: Some("cache-new".to_owned()),
            ..ServiceLogFilter::default()
        };

        let (old_update, new_update) = tokio::join!(view.refresh(client.list(&old_filter)), async {
            let update = view.refresh(client.list(&new_filter)).await;
            transport.release.notify_one();
            update
        });

        assert!(matches!(new_update, ViewUpdate::Applied));
        assert!(matches!(old_update, ViewUpdate::Superseded));
        assert!(view.page().is_some_and(|page| page.items()[0].instance_name == "cache-new"));
        assert!(!view.is_loading());
    }
}
