//! Sales analytics over completed orders
//!
//! Pure data-reshaping: orders fetched for a time window are distributed
//! into revenue buckets (hourly for a one-day view, daily otherwise),
//! summed into headline stats, and rolled up into a per-product top list.
//! No I/O here; the providers fetch, this module shapes.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AppError, AppResult, Order, OrderItem};

/// Reporting period selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Last 24 hours
    Day,
    /// Last 7 days
    Week,
    /// Last calendar month
    Month,
    /// Operator-picked range
    Custom {
        from: DateTime<Utc>,
        till: DateTime<Utc>,
    },
}

impl Period {
    /// Resolve to a concrete half-open `[from, till)` window
    pub fn window_at(&self, now: DateTime<Utc>) -> AppResult<PeriodWindow> {
        let (from, till) = match *self {
            Period::Day => (now - Duration::days(1), now),
            Period::Week => (now - Duration::days(7), now),
            Period::Month => {
                let from = now
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30));
                (from, now)
            }
            Period::Custom { from, till } => (from, till),
        };

        if from >= till {
            return Err(AppError::bad_window(format!(
                "Empty or inverted window: {} .. {}",
                from, till
            )));
        }

        Ok(PeriodWindow { from, till })
    }

    /// Resolve against the current clock
    pub fn window(&self) -> AppResult<PeriodWindow> {
        self.window_at(Utc::now())
    }

    /// Label used in headlines and export filenames
    pub fn text(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Custom { .. } => "custom",
        }
    }
}

/// Concrete half-open time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub from: DateTime<Utc>,
    pub till: DateTime<Utc>,
}

impl PeriodWindow {
    pub fn duration(&self) -> Duration {
        self.till - self.from
    }

    /// Windows up to one day are charted hourly, longer ones daily
    pub fn bucket_len(&self) -> Duration {
        if self.duration() <= Duration::days(1) {
            Duration::hours(1)
        } else {
            Duration::days(1)
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at < self.till
    }
}

/// A single slot of the revenue series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Display label: "14:00" for hourly slots, "2025-03-14" for daily
    pub label: String,
    /// Start of the slot
    pub start: DateTime<Utc>,
    /// Sum of order totals whose timestamps fall in this slot
    pub revenue: f64,
    /// Number of orders in this slot
    pub orders: u64,
}

/// Distribute order totals into fixed-width buckets across the window.
///
/// Each order timestamp inside the window lands in exactly one bucket;
/// orders outside the window are skipped so a stale fetch resolving after
/// a period switch cannot pollute the newer view.
pub fn bucket_revenue(orders: &[Order], window: &PeriodWindow) -> Vec<RevenueBucket> {
    let bucket_len = window.bucket_len();
    let bucket_secs = bucket_len.num_seconds();
    let total_secs = window.duration().num_seconds();
    let count = ((total_secs + bucket_secs - 1) / bucket_secs) as usize;

    let mut buckets: Vec<RevenueBucket> = (0..count)
        .map(|i| {
            let start = window.from + bucket_len * i as i32;
            let label = if bucket_secs < Duration::days(1).num_seconds() {
                start.format("%H:00").to_string()
            } else {
                start.format("%Y-%m-%d").to_string()
            };
            RevenueBucket {
                label,
                start,
                revenue: 0.0,
                orders: 0,
            }
        })
        .collect();

    let mut skipped = 0usize;
    for order in orders {
        let at = order.effective_at();
        if !window.contains(at) {
            skipped += 1;
            continue;
        }
        let index = ((at - window.from).num_seconds() / bucket_secs) as usize;
        // `contains` guarantees index < count
        if let Some(bucket) = buckets.get_mut(index) {
            bucket.revenue += order.total_amount;
            bucket.orders += 1;
        }
    }

    if skipped > 0 {
        debug!("⏭️ {} orders outside window skipped", skipped);
    }

    buckets
}

/// Headline statistics for a set of orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersStats {
    /// Revenue rounded to whole currency units for display
    pub total_revenue: i64,
    pub total_orders: u64,
    /// Average order value, rounded
    pub average_order: i64,
}

/// Sum totals and compute the average check
pub fn orders_stats(orders: &[Order]) -> OrdersStats {
    let total_revenue: f64 = orders.iter().map(|o| o.total_amount).sum();
    let total_orders = orders.len() as u64;
    let average = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    OrdersStats {
        total_revenue: total_revenue.round() as i64,
        total_orders,
        average_order: average.round() as i64,
    }
}

/// Per-product sales rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: i64,
    pub name: String,
    pub revenue: f64,
    pub qty: u64,
}

/// Roll order items up by product, sorted by revenue, top `limit`.
/// Revenue includes billable modifier surcharges.
pub fn top_products(items: &[OrderItem], limit: usize) -> Vec<ProductSales> {
    let mut by_product: Vec<ProductSales> = Vec::new();

    for item in items {
        let revenue = item.line_total();
        match by_product.iter_mut().find(|p| p.product_id == item.product_id) {
            Some(existing) => {
                existing.revenue += revenue;
                existing.qty += item.qty as u64;
            }
            None => by_product.push(ProductSales {
                product_id: item.product_id,
                name: item.name.clone(),
                revenue,
                qty: item.qty as u64,
            }),
        }
    }

    by_product.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    by_product.truncate(limit);
    by_product
}

/// Assembled analytics view for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub period_text: String,
    pub from: DateTime<Utc>,
    pub till: DateTime<Utc>,
    pub stats: OrdersStats,
    pub series: Vec<RevenueBucket>,
    pub top_products: Vec<ProductSales>,
}

impl AnalyticsReport {
    pub fn build(
        period: Period,
        window: PeriodWindow,
        orders: &[Order],
        items: &[OrderItem],
    ) -> Self {
        Self {
            period_text: period.text().to_string(),
            from: window.from,
            till: window.till,
            stats: orders_stats(orders),
            series: bucket_revenue(orders, &window),
            top_products: top_products(items, 5),
        }
    }

    /// Terminal rendering of the headline numbers and the revenue series
    pub fn summary(&self) -> String {
        let mut output = format!(
            "\n📊 Sales for {} ({} .. {})\n",
            self.period_text,
            self.from.format("%Y-%m-%d %H:%M"),
            self.till.format("%Y-%m-%d %H:%M"),
        );
        output.push_str(&format!("   Revenue:     {} ₽\n", self.stats.total_revenue));
        output.push_str(&format!("   Orders:      {}\n", self.stats.total_orders));
        output.push_str(&format!("   Avg. check:  {} ₽\n", self.stats.average_order));

        let peak = self
            .series
            .iter()
            .map(|b| b.revenue)
            .fold(0.0f64, f64::max);
        if peak > 0.0 {
            output.push_str("   Revenue series:\n");
            for bucket in &self.series {
                let width = ((bucket.revenue / peak) * 30.0).round() as usize;
                output.push_str(&format!(
                    "     {:<10} {:>10.0} ₽ {}\n",
                    bucket.label,
                    bucket.revenue,
                    "█".repeat(width)
                ));
            }
        }

        if !self.top_products.is_empty() {
            output.push_str("   Top products:\n");
            for (rank, product) in self.top_products.iter().enumerate() {
                output.push_str(&format!(
                    "     {}. {} | {} pc, {:.0} ₽\n",
                    rank + 1,
                    product.name,
                    product.qty,
                    product.revenue
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemModifier, OrderStatus};

    fn order(id: i64, completed_at: &str, total: f64) -> Order {
        Order {
            order_id: id,
            status: OrderStatus::Completed,
            draft_at: completed_at.parse().unwrap(),
            completed_at: Some(completed_at.parse().unwrap()),
            paid_at: None,
            total_amount: total,
            is_paid: true,
        }
    }

    fn window(from: &str, till: &str) -> PeriodWindow {
        PeriodWindow {
            from: from.parse().unwrap(),
            till: till.parse().unwrap(),
        }
    }

    #[test]
    fn test_day_window_is_hourly_24_buckets() {
        let w = window("2025-03-10T08:00:00Z", "2025-03-11T08:00:00Z");
        let buckets = bucket_revenue(&[], &w);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[0].label, "08:00");
        assert_eq!(buckets[23].label, "07:00");
    }

    #[test]
    fn test_week_window_is_daily_7_buckets() {
        let w = window("2025-03-03T12:00:00Z", "2025-03-10T12:00:00Z");
        let buckets = bucket_revenue(&[], &w);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "2025-03-03");
    }

    #[test]
    fn test_order_lands_in_exactly_one_bucket() {
        let w = window("2025-03-10T00:00:00Z", "2025-03-11T00:00:00Z");
        let orders = vec![order(1, "2025-03-10T13:37:00Z", 450.0)];
        let buckets = bucket_revenue(&orders, &w);

        let populated: Vec<&RevenueBucket> =
            buckets.iter().filter(|b| b.orders > 0).collect();
        assert_eq!(populated.len(), 1);
        assert_eq!(populated[0].label, "13:00");
        assert_eq!(populated[0].revenue, 450.0);
    }

    #[test]
    fn test_bucket_sums_preserve_total() {
        let w = window("2025-03-03T00:00:00Z", "2025-03-10T00:00:00Z");
        let orders = vec![
            order(1, "2025-03-03T09:00:00Z", 100.0),
            order(2, "2025-03-03T21:00:00Z", 200.0),
            order(3, "2025-03-09T23:59:59Z", 300.0),
        ];
        let buckets = bucket_revenue(&orders, &w);
        let total: f64 = buckets.iter().map(|b| b.revenue).sum();
        assert_eq!(total, 600.0);
        assert_eq!(buckets[0].orders, 2);
        assert_eq!(buckets[6].orders, 1);
    }

    #[test]
    fn test_orders_outside_window_are_skipped() {
        let w = window("2025-03-10T00:00:00Z", "2025-03-11T00:00:00Z");
        let orders = vec![
            order(1, "2025-03-09T23:59:59Z", 100.0), // before
            order(2, "2025-03-11T00:00:00Z", 200.0), // at till (half-open)
            order(3, "2025-03-10T12:00:00Z", 300.0), // inside
        ];
        let buckets = bucket_revenue(&orders, &w);
        let total: f64 = buckets.iter().map(|b| b.revenue).sum();
        assert_eq!(total, 300.0);
    }

    #[test]
    fn test_stats_rounding() {
        let orders = vec![
            order(1, "2025-03-10T10:00:00Z", 100.4),
            order(2, "2025-03-10T11:00:00Z", 200.4),
        ];
        let stats = orders_stats(&orders);
        assert_eq!(stats.total_revenue, 301);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.average_order, 150);
    }

    #[test]
    fn test_stats_empty() {
        let stats = orders_stats(&[]);
        assert_eq!(stats.total_revenue, 0);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.average_order, 0);
    }

    #[test]
    fn test_period_windows() {
        let now: DateTime<Utc> = "2025-03-15T12:00:00Z".parse().unwrap();
        let day = Period::Day.window_at(now).unwrap();
        assert_eq!(day.duration(), Duration::days(1));
        let week = Period::Week.window_at(now).unwrap();
        assert_eq!(week.duration(), Duration::days(7));
        let month = Period::Month.window_at(now).unwrap();
        assert_eq!(month.from, "2025-02-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_inverted_custom_window_rejected() {
        let from: DateTime<Utc> = "2025-03-15T00:00:00Z".parse().unwrap();
        let till: DateTime<Utc> = "2025-03-10T00:00:00Z".parse().unwrap();
        let result = Period::Custom { from, till }.window();
        assert!(result.is_err());
    }

    #[test]
    fn test_top_products_rollup() {
        let items = vec![
            OrderItem {
                order_item_id: 1,
                order_id: 1,
                product_id: 7,
                name: "Burger".to_string(),
                qty: 2,
                unit_price: 300.0,
                modifiers: vec![],
            },
            OrderItem {
                order_item_id: 2,
                order_id: 2,
                product_id: 7,
                name: "Burger".to_string(),
                qty: 1,
                unit_price: 300.0,
                modifiers: vec![ItemModifier {
                    product_topping_id: 4,
                    name: "Bacon".to_string(),
                    qty: 1,
                    qty_default: 0,
                    unit_price: 40.0,
                }],
            },
            OrderItem {
                order_item_id: 3,
                order_id: 1,
                product_id: 9,
                name: "Cola".to_string(),
                qty: 3,
                unit_price: 90.0,
                modifiers: vec![],
            },
        ];

        let top = top_products(&items, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_id, 7);
        assert_eq!(top[0].qty, 3);
        assert_eq!(top[0].revenue, 940.0); // 600 + 300 + 40 surcharge
        assert_eq!(top[1].product_id, 9);
        assert_eq!(top[1].revenue, 270.0);
    }

    #[test]
    fn test_top_products_limit() {
        let items: Vec<OrderItem> = (0..10)
            .map(|i| OrderItem {
                order_item_id: i,
                order_id: 1,
                product_id: i,
                name: format!("P{}", i),
                qty: 1,
                unit_price: i as f64,
                modifiers: vec![],
            })
            .collect();
        let top = top_products(&items, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].product_id, 9);
    }

    #[test]
    fn test_report_summary_mentions_headlines() {
        let w = window("2025-03-10T00:00:00Z", "2025-03-11T00:00:00Z");
        let orders = vec![order(1, "2025-03-10T12:00:00Z", 500.0)];
        let report = AnalyticsReport::build(Period::Day, w, &orders, &[]);
        let summary = report.summary();
        assert!(summary.contains("Revenue:"));
        assert!(summary.contains("500 ₽"));
        assert!(summary.contains("Orders:"));
    }
}
