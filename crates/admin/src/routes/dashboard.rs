//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use loomworks_core::{DashboardStats, Order};
use rust_decimal::Decimal;
use tracing::instrument;

use super::{AdminUserView, fetched_or_banner};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Stat card and status overview values.
#[derive(Debug, Clone, Default)]
pub struct StatsView {
    pub total_sales: Decimal,
    pub today_sales: Decimal,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub processing_orders: i64,
    pub shipped_orders: i64,
    pub delivered_orders: i64,
    pub active_products: i64,
    pub low_stock_products: i64,
    pub total_customers: i64,
}

impl From<&DashboardStats> for StatsView {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            total_sales: stats.total_sales,
            today_sales: stats.today_sales,
            total_orders: stats.total_orders,
            pending_orders: stats.pending_orders,
            processing_orders: stats.processing_orders,
            shipped_orders: stats.shipped_orders,
            delivered_orders: stats.delivered_orders,
            active_products: stats.active_products,
            low_stock_products: stats.low_stock_products,
            total_customers: stats.total_customers,
        }
    }
}

/// Recent order row.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub customer_name: String,
    pub total: Decimal,
    pub status: &'static str,
    pub status_class: &'static str,
    pub date: String,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer_details.full_name.clone(),
            total: order.total_amount,
            status: order.status.as_str(),
            status_class: super::orders::status_class(order.status),
            date: order
                .created_at
                .as_ref()
                .map(filters::format_date)
                .unwrap_or_default(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub stats: StatsView,
    pub recent_orders: Vec<RecentOrderView>,
    pub error: Option<String>,
}

/// Dashboard page handler.
#[instrument(skip(session, state))]
pub async fn index(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let (stats, error) =
        fetched_or_banner(state.api().dashboard_stats().await, "dashboard stats")?;
    let stats = stats.unwrap_or_default();

    let recent_orders = stats.recent_orders.iter().map(RecentOrderView::from).collect();

    Ok(DashboardTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/dashboard",
        pending_reviews: state.reviews().pending_count(),
        stats: StatsView::from(&stats),
        recent_orders,
        error,
    })
}
