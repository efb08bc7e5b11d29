// Service exports
pub mod gateway;
pub mod storage;

pub use gateway::{ApiClient, GatewayError};
pub use storage::{IdentityStore, JsonFileStore, MemoryStore, StoreError, IDENTITY_KEY};
