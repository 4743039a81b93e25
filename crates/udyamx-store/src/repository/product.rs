//! # Product Repository
//!
//! The inventory record (`udyamx-inventory`): a JSON array of products.
//!
//! A fresh install has no record; the first read seeds the three starter
//! products and persists them, so every later read sees the same ids.

use tracing::{debug, info};
use udyamx_core::{Product, INVENTORY_STORAGE_KEY};

use crate::error::{DbError, DbResult};
use crate::repository::kv::LocalStore;

/// Repository for the product list.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: LocalStore,
}

impl ProductRepository {
    pub fn new(store: LocalStore) -> Self {
        ProductRepository { store }
    }

    /// All products, in insertion order. Seeds the starter inventory on first use.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        if !self.store.contains(INVENTORY_STORAGE_KEY).await? {
            let starter = Product::starter_inventory();
            if self.store.write_if_absent(INVENTORY_STORAGE_KEY, &starter).await? {
                info!(count = starter.len(), "Seeded starter inventory");
                return Ok(starter);
            }
        }

        self.store
            .read(INVENTORY_STORAGE_KEY, Product::starter_inventory())
            .await
    }

    /// Finds a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Product> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.sku == sku)
            .ok_or_else(|| DbError::not_found("Product", sku))
    }

    /// Appends a product. SKUs are unique.
    pub async fn insert(&self, product: Product) -> DbResult<()> {
        self.modify_with(|products| {
            if products.iter().any(|p| p.sku == product.sku) {
                return Err(DbError::DuplicateSku(product.sku));
            }

            debug!(sku = %product.sku, "Inserting product");
            products.push(product);
            Ok(())
        })
        .await
    }

    /// Overwrites the whole record.
    pub async fn replace_all(&self, products: &[Product]) -> DbResult<()> {
        self.store.write(INVENTORY_STORAGE_KEY, products).await
    }

    /// Loads the list, lets `f` edit it, and writes it back.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let outcome = db.products().modify(|p| resolve_scan(p, code)).await?;
    /// ```
    pub async fn modify<R>(&self, f: impl FnOnce(&mut Vec<Product>) -> R) -> DbResult<R> {
        self.modify_with(|products| Ok(f(products))).await
    }

    async fn modify_with<R>(&self, f: impl FnOnce(&mut Vec<Product>) -> DbResult<R>) -> DbResult<R> {
        // Seed first so the edit applies to the persisted starter list
        self.list().await?;
        self.store
            .update(INVENTORY_STORAGE_KEY, Product::starter_inventory(), f)
            .await
    }
}
