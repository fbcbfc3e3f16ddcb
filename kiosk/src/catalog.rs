//! Catalog snapshot
//!
//! The last known product list. Only active products are kept. A snapshot
//! restored from local storage, or kept after a failed refresh, is marked
//! stale until the next successful refresh.

use crate::types::Product;

/// Last known product list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    stale: bool,
}

impl Catalog {
    /// Catalog from a fresh backend response
    #[must_use]
    pub fn fresh(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().filter(|p| p.active).collect(),
            stale: false,
        }
    }

    /// Catalog from a persisted snapshot
    #[must_use]
    pub fn restored(products: Vec<Product>) -> Self {
        Self {
            stale: true,
            ..Self::fresh(products)
        }
    }

    /// Product by id
    #[must_use]
    pub fn get(&self, product_id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Products in backend order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether this snapshot may be out of date
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Keep the snapshot but flag it as out of date
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
