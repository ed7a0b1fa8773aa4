//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_key_value_storage;
mod in_memory_key_value_storage;
mod reqwest_api_transport;

pub use file_key_value_storage::FileKeyValueStorage;
pub use in_memory_key_value_storage::InMemoryKeyValueStorage;
pub use reqwest_api_transport::ReqwestApiTransport;
