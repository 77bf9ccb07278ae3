//! Order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use chrono::NaiveDate;
use loomworks_core::{Order, OrderId, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, fetched_or_banner, redirect_with_error, redirect_with_success};
use crate::api::OrderQuery;
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// How many orders a listing page fetches.
const ORDER_FETCH_LIMIT: u32 = 100;

// =============================================================================
// Query and Form Types
// =============================================================================

/// Listing page query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Fulfillment status dropdown entry.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Dropdown entries for every fulfillment status, one marked selected.
fn status_options(selected: Option<OrderStatus>) -> Vec<StatusOption> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            selected: selected == Some(*status),
        })
        .collect()
}

/// CSS class for a status badge.
#[must_use]
pub fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Processing => "processing",
        OrderStatus::Shipped => "shipped",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

/// Order row for the listing table.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_city: String,
    /// One line per item, e.g. `2x Jute Tote`.
    pub items: Vec<String>,
    pub total: Decimal,
    pub status_class: &'static str,
    pub status_options: Vec<StatusOption>,
    pub date: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer_details.full_name.clone(),
            customer_city: order.customer_details.city.clone(),
            items: order
                .items
                .iter()
                .map(|item| format!("{}x {}", item.quantity, item.title))
                .collect(),
            total: order.total_amount,
            status_class: status_class(order.status),
            status_options: status_options(Some(order.status)),
            date: order
                .created_at
                .as_ref()
                .map(filters::format_date)
                .unwrap_or_default(),
        }
    }
}

/// Order listing template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub orders: Vec<OrderRow>,
    pub total: usize,
    pub filter_statuses: Vec<StatusOption>,
    pub from: String,
    pub to: String,
    pub filtered: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Filtering
// =============================================================================

/// Status filter value from the query string. `all`, empty, and unknown
/// values mean no filter.
fn parse_status_param(raw: Option<&str>) -> Option<OrderStatus> {
    raw.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .and_then(|s| s.parse().ok())
}

/// Date filter value; invalid input is ignored rather than rejected.
fn parse_date_param(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Narrow the fetched orders by status and placement date.
///
/// Both date bounds are inclusive. Orders without a placement date are kept
/// unless a date filter is active, since they cannot satisfy one.
fn filter_orders(
    orders: Vec<Order>,
    status: Option<OrderStatus>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Order> {
    let date_filter_active = from.is_some() || to.is_some();

    orders
        .into_iter()
        .filter(|order| status.is_none_or(|s| order.status == s))
        .filter(|order| {
            if !date_filter_active {
                return true;
            }
            order.created_at.is_some_and(|ts| {
                let date = ts.date_naive();
                from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
            })
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Order listing page.
#[instrument(skip(session, state))]
pub async fn index(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<OrdersTemplate> {
    let upstream = OrderQuery {
        limit: Some(ORDER_FETCH_LIMIT),
        ..OrderQuery::default()
    };
    let (orders, fetch_error) =
        fetched_or_banner(state.api().list_orders(&upstream).await, "orders")?;
    let orders = orders.unwrap_or_default();
    let total = orders.len();

    let status = parse_status_param(query.status.as_deref());
    let from = parse_date_param(query.from.as_deref());
    let to = parse_date_param(query.to.as_deref());
    let filtered = status.is_some() || from.is_some() || to.is_some();

    let orders = filter_orders(orders, status, from, to);

    let mut filter_statuses = vec![StatusOption {
        value: "all",
        selected: status.is_none(),
    }];
    filter_statuses.extend(status_options(status));

    Ok(OrdersTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/orders",
        pending_reviews: state.reviews().pending_count(),
        orders: orders.iter().map(OrderRow::from).collect(),
        total,
        filter_statuses,
        from: query.from.unwrap_or_default(),
        to: query.to.unwrap_or_default(),
        filtered,
        error: query.error.or(fetch_error),
        success: query.success,
    })
}

/// Move an order to a new fulfillment status.
#[instrument(skip(state, form))]
pub async fn update_status(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(redirect_with_error("/orders", "Invalid order status"));
    };

    match state.api().update_order_status(&id, status).await {
        Ok(order) => {
            tracing::info!(%id, status = order.status.as_str(), "Order status updated");
            Ok(redirect_with_success("/orders", "Order status updated"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/orders", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}
