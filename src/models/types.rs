//! Typed representations of the POS service resources
//!
//! Everything here mirrors the wire format of the remote REST API
//! (snake_case fields, SCREAMING_SNAKE enum variants). The service owns
//! these entities; the client only fetches, displays and submits edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Access control
// ============================================

/// Named permission scope attached to a bearer token.
/// The resolved set gates which pages/actions the console offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessModule {
    MenuRead,
    MenuWrite,
    OrderRead,
    OrderWrite,
}

impl AccessModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessModule::MenuRead => "MENU_READ",
            AccessModule::MenuWrite => "MENU_WRITE",
            AccessModule::OrderRead => "ORDER_READ",
            AccessModule::OrderWrite => "ORDER_WRITE",
        }
    }
}

/// Resolved token info from `GET /authorization_tokens/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub access_modules: Vec<AccessModule>,
}

impl TokenInfo {
    /// Check a single access module
    pub fn has_access(&self, module: AccessModule) -> bool {
        self.access_modules.contains(&module)
    }

    /// Menu page is visible with either read or write rights
    pub fn can_view_menu(&self) -> bool {
        self.has_access(AccessModule::MenuRead) || self.has_access(AccessModule::MenuWrite)
    }

    /// Catalog edits need the write module specifically
    pub fn can_edit_menu(&self) -> bool {
        self.has_access(AccessModule::MenuWrite)
    }

    /// Analytics and export are gated on order read rights
    pub fn can_view_analytics(&self) -> bool {
        self.has_access(AccessModule::OrderRead)
    }
}

/// The venue the token belongs to, from `GET /client_points/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPoint {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Remaining subscription, from `GET /client_points/me/subscription_days`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionDays {
    #[serde(default)]
    pub days: i64,
}

impl SubscriptionDays {
    pub fn is_active(&self) -> bool {
        self.days > 0
    }
}

// ============================================
// Catalog: products, categories, toppings
// ============================================

/// Product type. The four marked variants are subject to regulatory
/// digital marking and restricted to a unit quantity of exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Normal,
    WaterMarked,
    DairyMarked,
    JuiceMarked,
    NotAlcoholBeerMarked,
}

impl ProductType {
    /// Whether this type carries a regulatory marking
    pub fn is_marked(&self) -> bool {
        !matches!(self, ProductType::Normal)
    }
}

/// Tax category applied at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxGroup {
    NoVat,
    // rename_all would drop the underscore before the digits
    #[serde(rename = "VAT_18")]
    Vat18,
}

/// Unit of measure for quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QtyMeasure {
    Pieces,
    Grams,
}

/// A sellable product from `/menu/products`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub tax: TaxGroup,
    pub qty_measure: QtyMeasure,
    pub qty_min: u32,
    pub qty_max: u32,
    pub qty_default: u32,
    pub unit_price: f64,
    pub is_active: bool,
}

/// Create payload for `POST /menu/products`.
/// Validated client-side before the request goes out.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub tax: TaxGroup,
    pub qty_measure: QtyMeasure,
    pub qty_min: u32,
    pub qty_max: u32,
    pub qty_default: u32,
    pub unit_price: f64,
    pub is_active: bool,
}

/// Partial update for `PATCH /menu/products/:id`.
/// Only fields that were actually set are serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<TaxGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_default: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.product_type.is_none()
            && self.tax.is_none()
            && self.qty_min.is_none()
            && self.qty_max.is_none()
            && self.qty_default.is_none()
            && self.unit_price.is_none()
            && self.is_active.is_none()
    }
}

/// A menu category from `/menu/categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub menu_category_id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Create payload for `POST /menu/categories`
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub is_active: bool,
}

/// Partial update for `PATCH /menu/categories/:id`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A topping attached to a product, from `/menu/product_toppings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topping {
    pub product_topping_id: i64,
    pub product_id: i64,
    pub name: String,
    /// Name of the owning product, present in list responses
    #[serde(default)]
    pub product_name: Option<String>,
    pub qty_measure: QtyMeasure,
    pub qty_min: u32,
    pub qty_max: u32,
    pub qty_default: u32,
    pub unit_price: f64,
    pub is_active: bool,
}

/// Create payload for `POST /menu/product_toppings`
#[derive(Debug, Clone, Serialize)]
pub struct NewTopping {
    pub product_id: i64,
    pub name: String,
    pub qty_measure: QtyMeasure,
    pub qty_min: u32,
    pub qty_max: u32,
    pub qty_default: u32,
    pub unit_price: f64,
    pub is_active: bool,
}

/// Partial update for `PATCH /menu/product_toppings/:id`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToppingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty_default: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ============================================
// Orders
// ============================================

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Draft,
    Formed,
    Preparing,
    Ready,
    Completed,
}

/// A completed order from `GET /orders/completed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub status: OrderStatus,
    pub draft_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub is_paid: bool,
}

impl Order {
    /// Timestamp used for analytics bucketing: completion time when the
    /// service recorded one, draft time otherwise.
    pub fn effective_at(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.draft_at)
    }
}

/// A line item of an order, from `GET /orders/items?order_id=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    pub qty: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub modifiers: Vec<ItemModifier>,
}

impl OrderItem {
    /// Line total: base price plus the billable modifier surcharge
    pub fn line_total(&self) -> f64 {
        let base = self.unit_price * self.qty as f64;
        let surcharge: f64 = self.modifiers.iter().map(|m| m.surcharge()).sum();
        base + surcharge
    }
}

/// A topping selection attached to a line item. Billed only for the
/// quantity above its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemModifier {
    pub product_topping_id: i64,
    pub name: String,
    pub qty: u32,
    pub qty_default: u32,
    pub unit_price: f64,
}

impl ItemModifier {
    /// Units actually charged for (quantity above the default, never negative)
    pub fn billable_qty(&self) -> u32 {
        self.qty.saturating_sub(self.qty_default)
    }

    pub fn surcharge(&self) -> f64 {
        self.billable_qty() as f64 * self.unit_price
    }
}
