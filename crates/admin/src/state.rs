//! Shared application state.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::AdminConfig;
use crate::services::review_poll::ReviewFeed;
use crate::session::SessionStore;

/// State shared across all request handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    reviews: ReviewFeed,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, api: ApiClient, reviews: ReviewFeed) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                reviews,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The session store behind the API client; the guard and the logout
    /// handler read and clear the same store the client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.inner.api.session()
    }

    #[must_use]
    pub fn reviews(&self) -> &ReviewFeed {
        &self.inner.reviews
    }
}
