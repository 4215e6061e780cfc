//! Client-side catalog validation
//!
//! The service enforces these rules too; validating before the request
//! gives the operator an immediate, specific message instead of a generic
//! 422. The marked-product rule is the one that actually bites: regulatory
//! marking requires selling by the piece, exactly one unit at a time.

use crate::models::{AppError, AppResult, NewProduct, NewTopping, ProductType, QtyMeasure};

/// Default quantity parameters for a product draft, per (type, measure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtyDefaults {
    pub qty_min: u32,
    pub qty_max: u32,
    pub qty_default: u32,
}

/// Quantity defaults when drafting a new product.
/// Marked types are pinned to the piece/1/1 rule regardless of measure.
pub fn product_qty_defaults(product_type: ProductType, measure: QtyMeasure) -> QtyDefaults {
    if product_type.is_marked() {
        return QtyDefaults {
            qty_min: 1,
            qty_max: 1,
            qty_default: 1,
        };
    }
    match measure {
        QtyMeasure::Pieces => QtyDefaults {
            qty_min: 1,
            qty_max: 999,
            qty_default: 1,
        },
        QtyMeasure::Grams => QtyDefaults {
            qty_min: 50,
            qty_max: 5000,
            qty_default: 100,
        },
    }
}

/// Quantity defaults when drafting a new topping
pub fn topping_qty_defaults() -> QtyDefaults {
    QtyDefaults {
        qty_min: 0,
        qty_max: 10,
        qty_default: 0,
    }
}

/// Validate a product create payload before it goes to the service
pub fn validate_new_product(product: &NewProduct) -> AppResult<()> {
    if product.name.trim().is_empty() {
        return Err(AppError::missing_field("name"));
    }

    validate_marked_rule(
        product.product_type,
        product.qty_measure,
        product.qty_max,
        product.qty_default,
    )?;

    validate_qty_bounds(product.qty_min, product.qty_max, product.qty_default)?;

    if product.unit_price <= 0.0 {
        return Err(AppError::new(
            crate::models::ErrorCode::MenuInvalidPrice,
            format!("Unit price must be positive, got {}", product.unit_price),
        ));
    }

    Ok(())
}

/// Validate a topping create payload
pub fn validate_new_topping(topping: &NewTopping) -> AppResult<()> {
    if topping.name.trim().is_empty() {
        return Err(AppError::missing_field("name"));
    }
    if topping.product_id <= 0 {
        return Err(AppError::missing_field("product_id"));
    }

    validate_qty_bounds(topping.qty_min, topping.qty_max, topping.qty_default)?;

    if topping.unit_price < 0.0 {
        return Err(AppError::new(
            crate::models::ErrorCode::MenuInvalidPrice,
            format!("Unit price must not be negative, got {}", topping.unit_price),
        ));
    }

    Ok(())
}

/// Marked product types must use piece measure with max/default fixed at 1
pub fn validate_marked_rule(
    product_type: ProductType,
    measure: QtyMeasure,
    qty_max: u32,
    qty_default: u32,
) -> AppResult<()> {
    if !product_type.is_marked() {
        return Ok(());
    }

    if measure != QtyMeasure::Pieces {
        return Err(AppError::marked_rule(
            "Marked products must be measured in pieces",
        ));
    }
    if qty_max != 1 || qty_default != 1 {
        return Err(AppError::marked_rule(format!(
            "Marked products are limited to exactly one unit (got max {}, default {})",
            qty_max, qty_default
        )));
    }

    Ok(())
}

fn validate_qty_bounds(qty_min: u32, qty_max: u32, qty_default: u32) -> AppResult<()> {
    if qty_min > qty_max {
        return Err(AppError::qty_bounds(format!(
            "qty_min {} exceeds qty_max {}",
            qty_min, qty_max
        )));
    }
    if qty_default < qty_min || qty_default > qty_max {
        return Err(AppError::qty_bounds(format!(
            "qty_default {} outside [{}, {}]",
            qty_default, qty_min, qty_max
        )));
    }
    Ok(())
}
