use paas_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Number of rows the API returns per page.
pub const PAGE_SIZE: u64 = 50;

/// Record type returned by a paginated listing endpoint.
pub trait Listed: DeserializeOwned {
    /// Envelope key holding the page items, e.g. `audit_logs`.
    const COLLECTION_KEY: &'static str;
}

/// One page of a listing, as returned by the API envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    count: u64,
    total: u64,
    page: u64,
}

impl<T> Page<T> {
    /// Creates a page after checking the envelope invariants.
    pub fn new(items: Vec<T>, count: u64, total: u64, page: u64) -> AppResult<Self> {
        let item_count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        if count != item_count {
            return Err(AppError::InvalidResponse(format!(
                "envelope count {count} does not match {item_count} items"
            )));
        }

        if page == 0 {
            return Err(AppError::InvalidResponse(
                "envelope page must be at least 1".to_owned(),
            ));
        }

        if total < count {
            return Err(AppError::InvalidResponse(format!(
                "envelope total {total} is smaller than count {count}"
            )));
        }

        Ok(Self {
            items,
            count,
            total,
            page,
        })
    }

    /// Returns the page items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consumes the page and returns its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of items in this page.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the number of items across all pages.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Returns whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of pages needed for `total` items.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(PAGE_SIZE).max(1)
    }

    /// Returns whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

impl<T: Listed> Page<T> {
    /// Decodes an envelope body keyed by `T::COLLECTION_KEY`.
    ///
    /// A `null` collection is read as an empty page. Listings that carry only
    /// `count` are read as a single complete page.
    pub fn from_json_slice(body: &[u8]) -> AppResult<Self> {
        let mut envelope = serde_json::from_slice::<Map<String, Value>>(body).map_err(|error| {
            AppError::InvalidResponse(format!("response body is not a JSON object: {error}"))
        })?;

        let items = match envelope.remove(T::COLLECTION_KEY) {
            Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<T>>(value).map_err(|error| {
                AppError::InvalidResponse(format!(
                    "failed to decode '{}' items: {error}",
                    T::COLLECTION_KEY
                ))
            })?,
            None => {
                return Err(AppError::InvalidResponse(format!(
                    "response body is missing '{}'",
                    T::COLLECTION_KEY
                )));
            }
        };

        let count = read_counter(&envelope, "count")?
            .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));
        let total = read_counter(&envelope, "total")?.unwrap_or(count);
        let page = read_counter(&envelope, "page")?.unwrap_or(1);

        Self::new(items, count, total, page)
    }
}

fn read_counter(envelope: &Map<String, Value>, key: &str) -> AppResult<Option<u64>> {
    match envelope.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            AppError::InvalidResponse(format!(
                "envelope field '{key}' must be a non-negative integer"
            ))
        }),
    }
}
