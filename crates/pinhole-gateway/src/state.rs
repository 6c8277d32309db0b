use std::sync::Arc;

use crate::error::{AppError, Result};
use pinhole_core::Repository;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Repository>,
    base_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Repository>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: public_base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs a store call on the blocking pool.
    ///
    /// The call runs to completion even if the request future is dropped,
    /// so a started log append is never abandoned halfway.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Repository) -> pinhole_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| AppError::Task(e.to_string()))?
            .map_err(AppError::from)
    }
}
