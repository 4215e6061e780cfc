//! CSV export of order data
//!
//! Shapes a fixed set of orders (with their fetched items and modifiers)
//! into sectioned CSV rows and writes the payload to a local file. The
//! format mirrors what the back office hands to accounting: an ORDERS
//! section, then an ITEMS section where modifier sub-rows carry only the
//! billable quantity above the default.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::analytics::PeriodWindow;
use crate::models::{AppResult, Order, OrderItem};
use crate::utils::labels::{order_status_text, yes_no};

/// An order paired with its line items for export
#[derive(Debug, Clone)]
pub struct OrderExport {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Number of columns in the ORDERS section
pub const ORDER_COLUMNS: usize = 6;
/// Number of columns in the ITEMS section
pub const ITEM_COLUMNS: usize = 5;

/// Build the sectioned report rows
pub fn build_report_rows(
    period_text: &str,
    generated_at: DateTime<Utc>,
    exports: &[OrderExport],
) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = vec![
        vec!["Orders report".to_string()],
        vec!["Period".to_string(), period_text.to_string()],
        vec![
            "Generated".to_string(),
            generated_at.format("%Y-%m-%d %H:%M").to_string(),
        ],
        vec![String::new()],
        vec!["ORDERS".to_string()],
        vec![
            "order_id".to_string(),
            "status".to_string(),
            "total_amount".to_string(),
            "created".to_string(),
            "paid".to_string(),
            "completed".to_string(),
        ],
    ];

    for export in exports {
        let order = &export.order;
        rows.push(vec![
            order.order_id.to_string(),
            order_status_text(order.status).to_string(),
            format!("{:.2}", order.total_amount),
            order.draft_at.format("%Y-%m-%d %H:%M").to_string(),
            yes_no(order.is_paid).to_string(),
            order
                .completed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    rows.push(vec![String::new()]);
    rows.push(vec!["ITEMS".to_string()]);
    rows.push(vec![
        "order_id".to_string(),
        "item".to_string(),
        "qty".to_string(),
        "unit_price".to_string(),
        "line_total".to_string(),
    ]);

    for export in exports {
        for item in &export.items {
            rows.push(vec![
                item.order_id.to_string(),
                item.name.clone(),
                item.qty.to_string(),
                format!("{:.2}", item.unit_price),
                format!("{:.2}", item.line_total()),
            ]);
            // Modifier sub-rows: billable quantity only
            for modifier in &item.modifiers {
                if modifier.billable_qty() == 0 {
                    continue;
                }
                rows.push(vec![
                    String::new(),
                    format!("+ {}", modifier.name),
                    modifier.billable_qty().to_string(),
                    format!("{:.2}", modifier.unit_price),
                    format!("{:.2}", modifier.surcharge()),
                ]);
            }
        }
    }

    rows
}

/// Serialize rows as CSV text: comma-separated, CRLF endings,
/// fields quoted when they contain separators or quotes.
pub fn rows_to_csv(rows: &[Vec<String>]) -> String {
    let mut csv = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(|field| escape_field(field)).collect();
        csv.push_str(&line.join(","));
        csv.push_str("\r\n");
    }
    csv
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Filename per period; custom ranges embed both endpoints
pub fn export_filename(period_text: &str, window: &PeriodWindow) -> String {
    if period_text == "custom" {
        format!(
            "orders_custom_{}_{}.csv",
            window.from.format("%Y%m%d"),
            window.till.format("%Y%m%d"),
        )
    } else {
        format!(
            "orders_{}_{}.csv",
            period_text,
            window.till.format("%Y%m%d"),
        )
    }
}

/// Write CSV text under `dir`, creating the directory when missing
pub fn write_csv(dir: &Path, filename: &str, csv: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, csv)?;
    info!("📄 Exported {} bytes to {}", csv.len(), path.display());
    Ok(path)
}
