//! Upstream record shapes.
//!
//! These structs mirror the JSON the store API sends and accepts: camelCase
//! field names, `_id` identifiers, RFC 3339 timestamps, and money as plain
//! JSON numbers. They carry no behavior beyond a few display helpers - the
//! upstream service owns the business rules.

pub mod customer;
pub mod dashboard;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use customer::{Customer, CustomerInput};
pub use dashboard::DashboardStats;
pub use order::{CustomerDetails, Order, OrderItem};
pub use product::{LOW_STOCK_THRESHOLD, Product, ProductInput};
pub use review::{Review, ReviewProduct};
pub use user::{AdminUser, LoginResponse};
