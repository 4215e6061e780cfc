//! POS Back Office Library
//!
//! Headless administration client for a restaurant point-of-sale API:
//! - Menu management (products, categories, toppings) with marked-goods rules
//! - Completed-order analytics bucketed by reporting period
//! - CSV export of order history for accounting
//! - Access-token verification and module-based gating

pub mod config;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use config::AdminConfig;
pub use core::{AnalyticsReport, OrderExport, OrdersStats, Period, PeriodWindow, RevenueBucket};
pub use models::{
    AccessModule, AppError, AppResult, Category, ErrorCode, Order, OrderItem, Product, Topping,
    TokenInfo,
};
pub use providers::{ApiClient, AuthClient, DiagnosticsClient, ErrorReport, MenuClient, OrdersClient};
pub use utils::{CacheStats, ListCache};
