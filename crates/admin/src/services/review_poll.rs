//! Shared review feed and its background refresh task.
//!
//! The sidebar shows a pending-review count on every page. Rather than
//! calling the upstream API once per page render, a background task polls
//! the review listing on an interval and page handlers read the cached
//! snapshot. The reviews page also writes its own fresh fetch back into the
//! feed so the badge and the page never disagree for long.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use loomworks_core::Review;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::{ApiError, ReviewQuery};
use crate::session::StoredSession;
use crate::state::AppState;

/// How many reviews each refresh asks for.
pub const REVIEW_FETCH_LIMIT: u32 = 200;

/// The latest known set of reviews, shared between the poll task and the
/// request handlers.
///
/// Fetches are bracketed by [`ReviewFeed::begin`] and [`ReviewFeed::commit`]:
/// begin hands out a monotonically increasing ticket before the fetch starts,
/// and commit applies the result only if no later fetch has landed in the
/// meantime. A slow poll response can therefore never overwrite the result
/// of a fetch that started after it.
#[derive(Clone, Default)]
pub struct ReviewFeed {
    inner: Arc<ReviewFeedInner>,
}

#[derive(Default)]
struct ReviewFeedInner {
    next_ticket: AtomicU64,
    state: RwLock<FeedState>,
}

#[derive(Default)]
struct FeedState {
    /// Ticket of the snapshot currently held; 0 before the first commit.
    applied: u64,
    reviews: Arc<Vec<Review>>,
}

impl ReviewFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a ticket for a fetch that is about to start.
    pub fn begin(&self) -> u64 {
        self.inner.next_ticket.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Apply a completed fetch. Returns `false` when the result is stale,
    /// i.e. a fetch with a later ticket already committed.
    pub fn commit(&self, ticket: u64, reviews: Vec<Review>) -> bool {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if ticket <= state.applied {
            return false;
        }
        state.applied = ticket;
        state.reviews = Arc::new(reviews);
        true
    }

    /// The current snapshot. Cheap; shares the underlying allocation.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Review>> {
        Arc::clone(
            &self
                .inner
                .state
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .reviews,
        )
    }

    /// Number of reviews awaiting moderation in the current snapshot.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.snapshot().iter().filter(|r| !r.is_approved).count()
    }
}

/// Start the periodic review refresh. The first tick fires immediately, so
/// the badge is populated right after startup when a session is stored.
pub fn spawn_review_poll(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(state.config().review_poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            refresh_reviews(&state).await;
        }
    })
}

/// One refresh pass. Also called right after login so the badge does not
/// wait out the first poll interval.
///
/// Skips silently without a usable session; the poller must never be the
/// thing that triggers a login redirect. If the upstream rejects the token
/// mid-poll the client has already cleared the session, and the next
/// navigation will land on the login page.
pub async fn refresh_reviews(state: &AppState) {
    if !matches!(state.session().get().await, StoredSession::Active(_)) {
        return;
    }

    let ticket = state.reviews().begin();
    let query = ReviewQuery {
        limit: Some(REVIEW_FETCH_LIMIT),
    };

    match state.api().list_reviews(&query).await {
        Ok(reviews) => {
            let total = reviews.len();
            if state.reviews().commit(ticket, reviews) {
                tracing::debug!(total, "Review feed refreshed");
            }
        }
        Err(ApiError::Unauthorized) => {
            tracing::info!("Review poll stopped: session rejected upstream");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Review poll failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, approved: bool) -> Review {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "productId": { "_id": "prod-1", "title": "Jute Tote" },
            "rating": 5,
            "comment": "Lovely weave",
            "customerName": "Asha",
            "isApproved": approved,
        }))
        .expect("review")
    }

    #[test]
    fn test_empty_feed() {
        let feed = ReviewFeed::new();
        assert!(feed.snapshot().is_empty());
        assert_eq!(feed.pending_count(), 0);
    }

    #[test]
    fn test_commit_applies_in_ticket_order() {
        let feed = ReviewFeed::new();
        let first = feed.begin();
        let second = feed.begin();

        assert!(feed.commit(second, vec![review("r2", false)]));
        // The earlier fetch finished late; its result is discarded.
        assert!(!feed.commit(first, vec![review("r1", false)]));

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 1);
        let kept = snapshot.first().expect("committed review");
        assert_eq!(kept.id.as_str(), "r2");
    }

    #[test]
    fn test_later_commit_replaces_earlier() {
        let feed = ReviewFeed::new();
        let first = feed.begin();
        assert!(feed.commit(first, vec![review("r1", false)]));

        let second = feed.begin();
        assert!(feed.commit(second, vec![review("r2", true), review("r3", false)]));

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(feed.pending_count(), 1);
    }

    #[test]
    fn test_pending_count_ignores_approved() {
        let feed = ReviewFeed::new();
        let ticket = feed.begin();
        feed.commit(
            ticket,
            vec![
                review("r1", true),
                review("r2", false),
                review("r3", false),
            ],
        );
        assert_eq!(feed.pending_count(), 2);
    }
}
