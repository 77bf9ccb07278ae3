//! Integration tests for the Loomworks admin panel.
//!
//! The tests under `tests/` boot the admin app in-process on an ephemeral
//! port, pointed at a wiremock stand-in for the store API. They need no
//! live upstream and no credentials:
//!
//! ```bash
//! cargo test -p loomworks-integration-tests
//! ```
//!
//! A few smoke tests are marked `#[ignore]` and expect a running panel
//! (`cargo run -p loomworks-admin`); run those with `-- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use url::Url;
use wiremock::MockServer;

use loomworks_admin::api::ApiClient;
use loomworks_admin::config::AdminConfig;
use loomworks_admin::routes;
use loomworks_admin::services::review_poll::ReviewFeed;
use loomworks_admin::session::SessionStore;
use loomworks_admin::state::AppState;

/// A running admin app wired to a mock store API.
///
/// Each context gets its own session file under the system temp directory,
/// removed again on drop. The background review poll is not started, so the
/// upstream only sees requests the tests cause.
pub struct TestContext {
    /// The mocked store API; mount expectations here.
    pub upstream: MockServer,
    /// Base URL of the in-process admin app.
    pub base_url: String,
    /// Session file backing this app instance.
    pub session_file: PathBuf,
}

impl TestContext {
    /// Boot the app with no stored session.
    pub async fn start() -> Self {
        let upstream = MockServer::start().await;
        let session_file = temp_session_file();
        let base_url = serve(&upstream, session_file.clone()).await;
        Self {
            upstream,
            base_url,
            session_file,
        }
    }

    /// Boot the app with an admin session already persisted.
    ///
    /// The stored token is `test-token`; mocks can match on the resulting
    /// `Authorization: Bearer test-token` header.
    pub async fn start_logged_in() -> Self {
        Self::start_with_session_file(&admin_session_json().to_string()).await
    }

    /// Boot the app with arbitrary session file contents, for exercising
    /// the guard against non-admin and unreadable sessions.
    pub async fn start_with_session_file(contents: &str) -> Self {
        let upstream = MockServer::start().await;
        let session_file = temp_session_file();
        std::fs::write(&session_file, contents).expect("Failed to seed session file");
        let base_url = serve(&upstream, session_file.clone()).await;
        Self {
            upstream,
            base_url,
            session_file,
        }
    }

    /// Full URL for a path on the admin app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.session_file);
    }
}

/// Session file contents for a logged-in admin.
#[must_use]
pub fn admin_session_json() -> serde_json::Value {
    serde_json::json!({
        "token": "test-token",
        "user": {
            "_id": "admin-1",
            "name": "Store Admin",
            "email": "admin@loomworks.shop",
            "isAdmin": true
        }
    })
}

/// HTTP client that does not follow redirects, so tests can assert on
/// `Location` headers.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn temp_session_file() -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "loomworks-itest-session-{}-{n}.json",
        std::process::id()
    ))
}

/// Bind an ephemeral port and serve the app on it.
async fn serve(upstream: &MockServer, session_file: PathBuf) -> String {
    let config = AdminConfig {
        api_base_url: Url::parse(&upstream.uri()).expect("upstream URL"),
        host: "127.0.0.1".to_string(),
        port: 0,
        session_file: session_file.clone(),
        review_poll_interval: Duration::from_secs(3600),
        sentry_dsn: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        environment: "test".to_string(),
    };

    let session = SessionStore::load(&session_file);
    let api = ApiClient::new(upstream.uri(), session).expect("Failed to create API client");
    let state = AppState::new(config, api, ReviewFeed::new());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    tokio::spawn(async move {
        axum::serve(listener, routes::app(state))
            .await
            .expect("Admin app exited");
    });

    format!("http://{addr}")
}
