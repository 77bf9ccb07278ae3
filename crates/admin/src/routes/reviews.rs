//! Review moderation route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use loomworks_core::{Review, ReviewId};
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, fetched_or_banner, redirect_with_error, redirect_with_success};
use crate::api::ReviewQuery;
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdmin;
use crate::services::review_poll::REVIEW_FETCH_LIMIT;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Listing page query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tab: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Moderation queue tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewTab {
    #[default]
    Pending,
    Approved,
    All,
}

impl ReviewTab {
    /// Tab from the query parameter; unknown values land on the default.
    fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("approved") => Self::Approved,
            Some("all") => Self::All,
            _ => Self::Pending,
        }
    }

    /// Query parameter value for this tab.
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::All => "all",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending Approval",
            Self::Approved => "Approved",
            Self::All => "All Reviews",
        }
    }

    /// Whether a review belongs on this tab.
    const fn matches(self, review: &Review) -> bool {
        match self {
            Self::Pending => !review.is_approved,
            Self::Approved => review.is_approved,
            Self::All => true,
        }
    }

    /// Shown when the tab has nothing to list.
    const fn empty_message(self) -> &'static str {
        match self {
            Self::Pending => "No pending reviews",
            Self::Approved => "No approved reviews",
            Self::All => "No reviews yet",
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Tab header with its review count.
#[derive(Debug, Clone)]
pub struct TabView {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub active: bool,
}

/// Review card for the moderation queue.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub id: String,
    pub product_title: String,
    pub customer_name: String,
    pub stars: String,
    pub comment: String,
    pub is_approved: bool,
    pub verified: bool,
    pub date: String,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            product_title: review
                .product
                .title()
                .unwrap_or("Product")
                .to_string(),
            customer_name: review.customer_name.clone(),
            stars: stars(review.rating),
            comment: review.comment.clone(),
            is_approved: review.is_approved,
            verified: review.is_verified_purchase,
            date: review
                .created_at
                .as_ref()
                .map(filters::format_date)
                .unwrap_or_default(),
        }
    }
}

/// Star rating string, e.g. `★★★★☆` for a rating of four.
fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    let mut out = String::with_capacity(5 * '★'.len_utf8());
    for _ in 0..filled {
        out.push('★');
    }
    for _ in filled..5 {
        out.push('☆');
    }
    out
}

fn tab_views(reviews: &[Review], active: ReviewTab) -> Vec<TabView> {
    [ReviewTab::Pending, ReviewTab::Approved, ReviewTab::All]
        .into_iter()
        .map(|tab| TabView {
            key: tab.as_str(),
            label: tab.label(),
            count: reviews.iter().filter(|r| tab.matches(r)).count(),
            active: tab == active,
        })
        .collect()
}

/// Review moderation template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub tabs: Vec<TabView>,
    pub reviews: Vec<ReviewRow>,
    pub empty_message: &'static str,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Review moderation page.
///
/// The fetch also feeds the shared review cache so the sidebar badge
/// reflects what the moderator just saw.
#[instrument(skip(session, state))]
pub async fn index(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ReviewsTemplate> {
    let tab = ReviewTab::from_param(query.tab.as_deref());

    let upstream = ReviewQuery {
        limit: Some(REVIEW_FETCH_LIMIT),
    };
    let ticket = state.reviews().begin();
    let (reviews, fetch_error) =
        fetched_or_banner(state.api().list_reviews(&upstream).await, "reviews")?;

    // A failed fetch must not wipe the cached snapshot.
    if let Some(list) = &reviews {
        state.reviews().commit(ticket, list.clone());
    }
    let reviews = reviews.unwrap_or_default();

    let rows: Vec<ReviewRow> = reviews
        .iter()
        .filter(|r| tab.matches(r))
        .map(ReviewRow::from)
        .collect();

    Ok(ReviewsTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/reviews",
        pending_reviews: state.reviews().pending_count(),
        tabs: tab_views(&reviews, tab),
        reviews: rows,
        empty_message: tab.empty_message(),
        error: query.error.or(fetch_error),
        success: query.success,
    })
}

/// Publish a review to the storefront.
#[instrument(skip(state))]
pub async fn approve(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Redirect> {
    match state.api().approve_review(&id).await {
        Ok(review) => {
            tracing::info!(%id, rating = review.rating, "Review approved");
            Ok(redirect_with_success("/reviews", "Review approved"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/reviews", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Pull a review back out of the storefront.
#[instrument(skip(state))]
pub async fn reject(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Redirect> {
    match state.api().reject_review(&id).await {
        Ok(_review) => {
            tracing::info!(%id, "Review rejected");
            Ok(redirect_with_success("/reviews", "Review rejected"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/reviews", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Delete a review outright.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Redirect> {
    match state.api().delete_review(&id).await {
        Ok(()) => {
            tracing::info!(%id, "Review deleted");
            Ok(redirect_with_success("/reviews", "Review deleted"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/reviews", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}
