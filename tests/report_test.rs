//! End-to-end report pipeline tests on fixed order data
//!
//! Builds a small day of trade, runs it through stats, bucketing and CSV
//! generation, and checks the numbers an accountant would check.

use chrono::{DateTime, Duration, Utc};
use pos_backoffice::core::analytics::{bucket_revenue, orders_stats, top_products, Period};
use pos_backoffice::core::catalog;
use pos_backoffice::core::export::{
    build_report_rows, export_filename, rows_to_csv, OrderExport, ITEM_COLUMNS, ORDER_COLUMNS,
};
use pos_backoffice::models::{
    AccessModule, ItemModifier, NewProduct, Order, OrderItem, OrderStatus, ProductType,
    QtyMeasure, TaxGroup, TokenInfo,
};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn completed_order(id: i64, completed_at: &str, total: f64) -> Order {
    Order {
        order_id: id,
        status: OrderStatus::Completed,
        draft_at: ts(completed_at) - Duration::minutes(30),
        completed_at: Some(ts(completed_at)),
        paid_at: Some(ts(completed_at)),
        total_amount: total,
        is_paid: true,
    }
}

fn fixture_orders() -> Vec<Order> {
    vec![
        completed_order(1, "2025-03-14T09:15:00Z", 350.0),
        completed_order(2, "2025-03-14T09:45:00Z", 520.5),
        completed_order(3, "2025-03-14T13:05:00Z", 780.0),
        completed_order(4, "2025-03-14T19:59:00Z", 149.5),
    ]
}

#[test]
fn test_day_report_numbers() {
    let now = ts("2025-03-14T20:00:00Z");
    let window = Period::Day.window_at(now).unwrap();
    let orders = fixture_orders();

    let stats = orders_stats(&orders);
    assert_eq!(stats.total_orders, 4);
    assert_eq!(stats.total_revenue, 1800); // 1800.0 exactly
    assert_eq!(stats.average_order, 450);

    let buckets = bucket_revenue(&orders, &window);
    assert_eq!(buckets.len(), 24);

    // Every order landed somewhere and nothing was double counted
    let bucketed: f64 = buckets.iter().map(|b| b.revenue).sum();
    let counted: u64 = buckets.iter().map(|b| b.orders).sum();
    assert!((bucketed - 1800.0).abs() < f64::EPSILON);
    assert_eq!(counted, 4);

    // Orders 1 and 2 share the 09:00 slot
    let nine = buckets.iter().find(|b| b.label == "09:00").unwrap();
    assert_eq!(nine.orders, 2);
    assert!((nine.revenue - 870.5).abs() < f64::EPSILON);
}

#[test]
fn test_order_from_last_period_is_dropped() {
    let now = ts("2025-03-14T20:00:00Z");
    let window = Period::Day.window_at(now).unwrap();

    let mut orders = fixture_orders();
    orders.push(completed_order(99, "2025-03-12T12:00:00Z", 10_000.0));

    let buckets = bucket_revenue(&orders, &window);
    let bucketed: f64 = buckets.iter().map(|b| b.revenue).sum();
    assert!((bucketed - 1800.0).abs() < f64::EPSILON);
}

#[test]
fn test_csv_report_shape() {
    let orders = fixture_orders();
    let exports: Vec<OrderExport> = orders
        .into_iter()
        .map(|order| OrderExport {
            items: vec![OrderItem {
                order_item_id: order.order_id * 10,
                order_id: order.order_id,
                product_id: 7,
                name: "Soup \"of the day\", large".to_string(),
                qty: 1,
                unit_price: order.total_amount,
                modifiers: vec![ItemModifier {
                    product_topping_id: 3,
                    name: "Croutons".to_string(),
                    qty: 3,
                    qty_default: 1,
                    unit_price: 15.0,
                }],
            }],
            order,
        })
        .collect();

    let rows = build_report_rows("day", ts("2025-03-14T21:00:00Z"), &exports);
    let csv = rows_to_csv(&rows);

    // Each row ends with CRLF and parses back to the same field count
    for line in csv.split("\r\n").filter(|l| !l.is_empty()) {
        assert!(!line.ends_with('\n'));
    }

    let orders_header = rows.iter().position(|r| r[0] == "ORDERS").unwrap();
    let items_header = rows.iter().position(|r| r[0] == "ITEMS").unwrap();
    for row in &rows[orders_header + 1..items_header - 1] {
        if row.len() > 1 {
            assert_eq!(row.len(), ORDER_COLUMNS);
        }
    }
    for row in &rows[items_header + 1..] {
        assert_eq!(row.len(), ITEM_COLUMNS);
    }

    // Quoted fields survive the serializer
    assert!(csv.contains("\"Soup \"\"of the day\"\", large\""));
    // Modifier rows bill only the two croutons above the default
    assert!(csv.contains("+ Croutons,2,15.00,30.00"));
}

#[test]
fn test_export_filename_matches_period() {
    let now = ts("2025-03-14T20:00:00Z");
    let window = Period::Week.window_at(now).unwrap();
    assert_eq!(export_filename("week", &window), "orders_week_20250314.csv");
}

#[test]
fn test_top_products_include_surcharges() {
    let items = vec![
        OrderItem {
            order_item_id: 1,
            order_id: 1,
            product_id: 5,
            name: "Burger".to_string(),
            qty: 2,
            unit_price: 250.0,
            modifiers: vec![ItemModifier {
                product_topping_id: 1,
                name: "Cheese".to_string(),
                qty: 2,
                qty_default: 0,
                unit_price: 25.0,
            }],
        },
        OrderItem {
            order_item_id: 2,
            order_id: 2,
            product_id: 8,
            name: "Tea".to_string(),
            qty: 1,
            unit_price: 80.0,
            modifiers: vec![],
        },
    ];

    let top = top_products(&items, 5);
    assert_eq!(top[0].product_id, 5);
    assert!((top[0].revenue - 550.0).abs() < f64::EPSILON); // 500 + 2 * 25
    assert_eq!(top[1].product_id, 8);
}

#[test]
fn test_marked_product_is_rejected_before_it_reaches_the_menu() {
    let water = NewProduct {
        name: "Mineral water 0.5".to_string(),
        product_type: ProductType::WaterMarked,
        tax: TaxGroup::NoVat,
        qty_measure: QtyMeasure::Pieces,
        qty_min: 1,
        qty_max: 1,
        qty_default: 1,
        unit_price: 60.0,
        is_active: true,
    };
    assert!(catalog::validate_new_product(&water).is_ok());

    let mut by_weight = water.clone();
    by_weight.qty_measure = QtyMeasure::Grams;
    assert!(catalog::validate_new_product(&by_weight).is_err());

    let mut multi = water;
    multi.qty_max = 3;
    assert!(catalog::validate_new_product(&multi).is_err());
}

#[test]
fn test_access_gating_mirrors_module_grants() {
    let read_only: TokenInfo = serde_json::from_str(
        r#"{"access_modules": ["MENU_READ", "ORDER_READ"]}"#,
    )
    .unwrap();
    assert!(read_only.can_view_menu());
    assert!(!read_only.can_edit_menu());
    assert!(read_only.can_view_analytics());

    let menu_writer: TokenInfo = serde_json::from_str(
        r#"{"access_modules": ["MENU_WRITE"]}"#,
    )
    .unwrap();
    assert!(menu_writer.can_view_menu());
    assert!(menu_writer.can_edit_menu());
    assert!(!menu_writer.can_view_analytics());
    assert!(!menu_writer.has_access(AccessModule::OrderRead));
}
