pub mod analytics;
pub mod catalog;
pub mod export;

pub use analytics::{AnalyticsReport, OrdersStats, Period, PeriodWindow, RevenueBucket};
pub use export::OrderExport;
