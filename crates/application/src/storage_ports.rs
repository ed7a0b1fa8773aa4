use paas_core::AppResult;

/// Durable string key/value storage that survives process restarts.
///
/// Calls are synchronous: the session store writes through while holding its
/// state lock, so an adapter must never block on the async runtime. Adapters
/// report write failures as `AppError::Persistence`.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;
}
