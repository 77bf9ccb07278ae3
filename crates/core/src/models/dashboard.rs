//! Aggregate sales statistics for the dashboard landing page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Order;

/// Store-wide statistics as returned by the dashboard endpoint.
///
/// Every field defaults so a partially rolled-out upstream never blanks the
/// whole dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub today_sales: Decimal,
    #[serde(default)]
    pub total_orders: i64,
    #[serde(default)]
    pub pending_orders: i64,
    #[serde(default)]
    pub processing_orders: i64,
    #[serde(default)]
    pub shipped_orders: i64,
    #[serde(default)]
    pub delivered_orders: i64,
    #[serde(default)]
    pub active_products: i64,
    #[serde(default)]
    pub low_stock_products: i64,
    #[serde(default)]
    pub total_customers: i64,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}
