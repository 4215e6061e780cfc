//! Completed-order history
//!
//! Read-only access to /orders/*. The console only ever looks at
//! completed orders inside a time window, so the window endpoints are
//! the main entry point and single-order lookups exist for drill-down.

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::core::analytics::{Period, PeriodWindow};
use crate::models::{AppResult, Order, OrderItem};
use crate::providers::http::ApiClient;

pub struct OrdersClient {
    api: ApiClient,
}

impl OrdersClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Completed orders within a half-open [from, till) window
    pub async fn completed(&self, window: &PeriodWindow) -> AppResult<Vec<Order>> {
        let path = format!(
            "/orders/completed?from={}&till={}",
            window.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            window.till.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        let orders: Vec<Order> = self.api.get(&path).await?;
        info!("📊 Loaded {} completed orders", orders.len());
        Ok(orders)
    }

    /// Resolve a reporting period at "now" and fetch its orders
    pub async fn completed_for_period(
        &self,
        period: Period,
    ) -> AppResult<(PeriodWindow, Vec<Order>)> {
        let window = period.window()?;
        let orders = self.completed(&window).await?;
        Ok((window, orders))
    }

    /// Today's completed orders, from midnight UTC to now
    pub async fn completed_today(&self) -> AppResult<Vec<Order>> {
        let now = Utc::now();
        let window = PeriodWindow {
            from: now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(now),
            till: now,
        };
        self.completed(&window).await
    }

    pub async fn order(&self, order_id: i64) -> AppResult<Order> {
        self.api.get(&format!("/orders/{}", order_id)).await
    }

    /// Line items (with modifiers) for one order
    pub async fn items(&self, order_id: i64) -> AppResult<Vec<OrderItem>> {
        self.api
            .get(&format!("/orders/items?order_id={}", order_id))
            .await
    }

    /// Fetch items for a whole batch of orders, preserving order
    pub async fn items_for(&self, orders: &[Order]) -> AppResult<Vec<Vec<OrderItem>>> {
        let mut all = Vec::with_capacity(orders.len());
        for order in orders {
            all.push(self.items(order.order_id).await?);
        }
        Ok(all)
    }
}
