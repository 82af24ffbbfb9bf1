//! Application state management

use std::sync::Arc;

use csquare_core::{DataStore, Database, MemoryTokenStore, TokenStore};
use csquare_net::ApiClient;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;

/// Main application state
pub struct AppState {
    pub config: AppConfig,
    pub client: ApiClient,
    pub store: DataStore<ApiClient>,
}

impl AppState {
    /// Open the token database and build the client and store
    ///
    /// Without a usable data directory the session lives in memory only.
    pub fn new(config: AppConfig) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> = match Database::default_path() {
            Some(path) => {
                info!(path = %path.display(), "Opening token store");
                Arc::new(Database::open(&path)?)
            }
            None => {
                warn!("Could not determine data directory, admin session will not persist");
                Arc::new(MemoryTokenStore::default())
            }
        };
        Self::with_tokens(config, tokens)
    }

    pub fn with_tokens(config: AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = ApiClient::new(config.client_config(), tokens)?;
        let store = DataStore::with_timeout(client.clone(), config.request_timeout());
        Ok(Self {
            config,
            client,
            store,
        })
    }
}
