use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::store::Store;

use crate::token::{TokenError, TokenMaker};

/// Process-wide dependencies, constructed once at startup and injected
/// into every router. Nothing here is mutated after construction.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Store>,
    pub tokens: TokenMaker,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, TokenError> {
        let tokens = TokenMaker::new(&config.token_symmetric_key)?;
        Ok(Self {
            config,
            store,
            tokens,
        })
    }
}
