//! Display labels and formatting helpers
//!
//! Single place that maps wire enum variants to operator-facing text, so the
//! CLI tables and the CSV report agree on wording.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::{OrderStatus, ProductType, QtyMeasure, TaxGroup};

lazy_static! {
    static ref STATUS_LABELS: HashMap<OrderStatus, &'static str> = {
        let mut m = HashMap::new();
        m.insert(OrderStatus::Draft, "Draft");
        m.insert(OrderStatus::Formed, "Formed");
        m.insert(OrderStatus::Preparing, "Preparing");
        m.insert(OrderStatus::Ready, "Ready");
        m.insert(OrderStatus::Completed, "Completed");
        m
    };
}

/// Operator-facing text for an order status
pub fn order_status_text(status: OrderStatus) -> &'static str {
    STATUS_LABELS.get(&status).copied().unwrap_or("Unknown")
}

/// Operator-facing text for a product type
pub fn product_type_text(product_type: ProductType) -> &'static str {
    match product_type {
        ProductType::Normal => "Regular",
        ProductType::WaterMarked => "Water (marked)",
        ProductType::DairyMarked => "Dairy (marked)",
        ProductType::JuiceMarked => "Juice (marked)",
        ProductType::NotAlcoholBeerMarked => "Non-alcoholic beer (marked)",
    }
}

/// Operator-facing text for a tax group
pub fn tax_text(tax: TaxGroup) -> &'static str {
    match tax {
        TaxGroup::NoVat => "No VAT",
        TaxGroup::Vat18 => "VAT 18%",
    }
}

/// Short unit suffix for quantities
pub fn measure_text(measure: QtyMeasure) -> &'static str {
    match measure {
        QtyMeasure::Pieces => "pc",
        QtyMeasure::Grams => "g",
    }
}

/// Price display. Weight-measured products are priced per gram on the wire
/// but shown per kilogram.
pub fn format_price(unit_price: f64, measure: QtyMeasure) -> String {
    match measure {
        QtyMeasure::Grams => format!("{:.2} ₽/kg", unit_price * 1000.0),
        QtyMeasure::Pieces => format!("{:.2} ₽", unit_price),
    }
}

/// Yes/No rendering for boolean columns in tables and CSV
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
