//! C-Square Network Library
//!
//! REST client for the club backend.
//!
//! # Usage
//!
//! ```ignore
//! let tokens = Arc::new(Database::open(Database::default_path().unwrap())?);
//! let client = ApiClient::new(ClientConfig::default(), tokens)?;
//!
//! // Public data feeds the cached store
//! let store = DataStore::new(client.clone());
//! store.load_all().await;
//!
//! // Admin calls carry the stored bearer token
//! client.login("admin", "secret").await?;
//! client.create(Resource::Events, &draft).await?;
//! ```

pub mod admin;
pub mod client;
pub mod error;

#[cfg(test)]
mod test_server;

pub use admin::{ImageUpload, Resource, MAX_UPLOAD_BYTES};
pub use client::{ApiClient, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
