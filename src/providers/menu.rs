//! Menu management: products, categories, toppings
//!
//! Wraps the /menu/* endpoints. List responses are cached briefly so
//! repeated console commands do not hammer the API; any mutation clears
//! the affected cache. New records are validated client-side before the
//! request goes out, matching what the API would reject anyway.

use serde_json::json;
use tracing::info;

use crate::core::catalog;
use crate::models::{
    AppResult, Category, CategoryPatch, NewCategory, NewProduct, NewTopping, Product,
    ProductPatch, Topping, ToppingPatch,
};
use crate::providers::http::ApiClient;
use crate::utils::cache::ListCache;

pub struct MenuClient {
    api: ApiClient,
    products: ListCache<Vec<Product>>,
    categories: ListCache<Vec<Category>>,
    toppings: ListCache<Vec<Topping>>,
}

impl MenuClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            products: ListCache::new(),
            categories: ListCache::new(),
            toppings: ListCache::new(),
        }
    }

    // ============================================
    // Products
    // ============================================

    pub async fn products(&self, only_active: bool) -> AppResult<Vec<Product>> {
        let key = if only_active { "products:active" } else { "products:all" };
        if let Some(cached) = self.products.get(key) {
            return Ok(cached);
        }

        let path = if only_active {
            "/menu/products?only_active=true"
        } else {
            "/menu/products"
        };
        let list: Vec<Product> = self.api.get(path).await?;
        info!("📊 Loaded {} products", list.len());
        self.products.set(key, list.clone());
        Ok(list)
    }

    pub async fn product(&self, product_id: i64) -> AppResult<Product> {
        self.api.get(&format!("/menu/products/{}", product_id)).await
    }

    pub async fn create_product(&self, new: &NewProduct) -> AppResult<Product> {
        catalog::validate_new_product(new)?;
        let created: Product = self.api.post("/menu/products", new).await?;
        info!("✅ Created product {} ({})", created.name, created.product_id);
        self.products.clear();
        Ok(created)
    }

    pub async fn update_product(&self, product_id: i64, patch: &ProductPatch) -> AppResult<Product> {
        let updated: Product = self
            .api
            .patch(&format!("/menu/products/{}", product_id), patch)
            .await?;
        self.products.clear();
        Ok(updated)
    }

    pub async fn delete_product(&self, product_id: i64) -> AppResult<()> {
        self.api.delete(&format!("/menu/products/{}", product_id)).await?;
        info!("🗑️ Deleted product {}", product_id);
        self.products.clear();
        Ok(())
    }

    // ============================================
    // Categories
    // ============================================

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        if let Some(cached) = self.categories.get("categories") {
            return Ok(cached);
        }
        let list: Vec<Category> = self.api.get("/menu/categories").await?;
        self.categories.set("categories", list.clone());
        Ok(list)
    }

    pub async fn create_category(&self, new: &NewCategory) -> AppResult<Category> {
        let created: Category = self.api.post("/menu/categories", new).await?;
        info!("✅ Created category {} ({})", created.name, created.menu_category_id);
        self.categories.clear();
        Ok(created)
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        patch: &CategoryPatch,
    ) -> AppResult<Category> {
        let updated: Category = self
            .api
            .patch(&format!("/menu/categories/{}", category_id), patch)
            .await?;
        self.categories.clear();
        Ok(updated)
    }

    pub async fn delete_category(&self, category_id: i64) -> AppResult<()> {
        self.api.delete(&format!("/menu/categories/{}", category_id)).await?;
        info!("🗑️ Deleted category {}", category_id);
        self.categories.clear();
        Ok(())
    }

    /// Products assigned to a category
    pub async fn category_products(&self, category_id: i64) -> AppResult<Vec<Product>> {
        self.api
            .get(&format!("/menu/categories/{}/products", category_id))
            .await
    }

    /// Attach products to a category in one call
    pub async fn assign_products(
        &self,
        category_id: i64,
        product_ids: &[i64],
    ) -> AppResult<Vec<Product>> {
        let assigned: Vec<Product> = self
            .api
            .patch(
                &format!("/menu/categories/{}/products", category_id),
                &json!({ "products_id": product_ids }),
            )
            .await?;
        info!("✅ Assigned {} products to category {}", product_ids.len(), category_id);
        Ok(assigned)
    }

    pub async fn unassign_product(&self, category_id: i64, product_id: i64) -> AppResult<()> {
        self.api
            .delete(&format!("/menu/categories/{}/products/{}", category_id, product_id))
            .await
    }

    // ============================================
    // Toppings
    // ============================================

    pub async fn toppings(&self, product_id: Option<i64>, only_active: bool) -> AppResult<Vec<Topping>> {
        let key = format!(
            "toppings:{}:{}",
            product_id.map(|id| id.to_string()).unwrap_or_else(|| "all".to_string()),
            only_active,
        );
        if let Some(cached) = self.toppings.get(&key) {
            return Ok(cached);
        }

        let mut params: Vec<String> = Vec::new();
        if let Some(id) = product_id {
            params.push(format!("product_id={}", id));
        }
        if only_active {
            params.push("only_active=true".to_string());
        }
        let path = if params.is_empty() {
            "/menu/product_toppings".to_string()
        } else {
            format!("/menu/product_toppings?{}", params.join("&"))
        };

        let list: Vec<Topping> = self.api.get(&path).await?;
        self.toppings.set(&key, list.clone());
        Ok(list)
    }

    pub async fn create_topping(&self, new: &NewTopping) -> AppResult<Topping> {
        catalog::validate_new_topping(new)?;
        let created: Topping = self.api.post("/menu/product_toppings", new).await?;
        info!("✅ Created topping {} ({})", created.name, created.product_topping_id);
        self.toppings.clear();
        Ok(created)
    }

    pub async fn update_topping(&self, topping_id: i64, patch: &ToppingPatch) -> AppResult<Topping> {
        let updated: Topping = self
            .api
            .patch(&format!("/menu/product_toppings/{}", topping_id), patch)
            .await?;
        self.toppings.clear();
        Ok(updated)
    }

    pub async fn delete_topping(&self, topping_id: i64) -> AppResult<()> {
        self.api.delete(&format!("/menu/product_toppings/{}", topping_id)).await?;
        info!("🗑️ Deleted topping {}", topping_id);
        self.toppings.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::models::{ProductType, QtyMeasure, TaxGroup};

    #[tokio::test]
    async fn test_create_product_rejects_invalid_before_network() {
        let api = ApiClient::new(AdminConfig::default());
        let menu = MenuClient::new(api);

        // Marked product with qty_max above one never reaches the wire
        let bad = NewProduct {
            name: "Milk 1L".to_string(),
            product_type: ProductType::DairyMarked,
            tax: TaxGroup::Vat18,
            qty_measure: QtyMeasure::Pieces,
            qty_min: 1,
            qty_max: 5,
            qty_default: 1,
            unit_price: 90.0,
            is_active: true,
        };
        let err = menu.create_product(&bad).await.unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::MenuMarkedRule);
    }

    #[tokio::test]
    async fn test_create_topping_rejects_empty_name() {
        let api = ApiClient::new(AdminConfig::default());
        let menu = MenuClient::new(api);

        let bad = NewTopping {
            product_id: 1,
            name: "  ".to_string(),
            qty_measure: QtyMeasure::Pieces,
            qty_min: 0,
            qty_max: 10,
            qty_default: 0,
            unit_price: 20.0,
            is_active: true,
        };
        let err = menu.create_topping(&bad).await.unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::MenuMissingField);
    }

    #[tokio::test]
    async fn test_products_served_from_cache() {
        let menu = MenuClient::new(ApiClient::new(AdminConfig::default()));
        let cached = vec![Product {
            product_id: 1,
            name: "Espresso".to_string(),
            product_type: ProductType::Normal,
            tax: TaxGroup::Vat18,
            qty_measure: QtyMeasure::Pieces,
            qty_min: 1,
            qty_max: 999,
            qty_default: 1,
            unit_price: 120.0,
            is_active: true,
        }];
        menu.products.set("products:all", cached);

        // Whole list comes back from the cache, no request goes out
        let listed = menu.products(false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Espresso");
    }
}
