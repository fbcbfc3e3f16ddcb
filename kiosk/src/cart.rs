//! Cart model
//!
//! Ordered line items keyed by product id. Quantities are bounded by the
//! product's stock at the time of the change; a line whose quantity drops
//! to zero is removed, never kept at zero.

use crate::catalog::Catalog;
use crate::error::KioskError;
use crate::types::CartLine;
use rust_decimal::Decimal;

/// The customer's cart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from persisted lines
    ///
    /// Zero-quantity lines are dropped and duplicate product ids are merged,
    /// so a hand-edited or half-written blob still yields a valid cart.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.qty > 0) {
            match cart.line_mut(line.product_id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(line.qty),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Add one unit of `product_id`
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// - [`KioskError::OutOfStock`]: product unknown or stock is zero
    /// - [`KioskError::StockExceeded`]: one more unit would exceed stock
    pub fn add(&mut self, catalog: &Catalog, product_id: u64) -> Result<u32, KioskError> {
        let product = catalog
            .get(product_id)
            .filter(|p| p.stock > 0)
            .ok_or(KioskError::OutOfStock { product_id })?;

        if let Some(line) = self.line_mut(product_id) {
            if line.qty >= product.stock {
                return Err(KioskError::StockExceeded {
                    product_id,
                    available: product.stock,
                });
            }
            line.qty += 1;
            return Ok(line.qty);
        }

        self.lines.push(CartLine {
            product_id,
            name: product.name.clone(),
            price: product.price,
            qty: 1,
        });
        Ok(1)
    }

    /// Change the quantity of an existing line by `delta`
    ///
    /// Returns `true` if the cart changed. A missing line or a zero delta is
    /// a no-op. Dropping to zero or below removes the line.
    ///
    /// # Errors
    ///
    /// - [`KioskError::OutOfStock`]: increase for a product no longer in the catalog
    /// - [`KioskError::StockExceeded`]: increase beyond stock
    pub fn change_qty(
        &mut self,
        catalog: &Catalog,
        product_id: u64,
        delta: i32,
    ) -> Result<bool, KioskError> {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return Ok(false);
        };
        if delta == 0 {
            return Ok(false);
        }

        let current = i64::from(self.lines[index].qty);
        let wanted = current + i64::from(delta);

        if wanted <= 0 {
            self.lines.remove(index);
            return Ok(true);
        }

        if delta > 0 {
            let stock = catalog
                .get(product_id)
                .map(|p| p.stock)
                .ok_or(KioskError::OutOfStock { product_id })?;
            if wanted > i64::from(stock) {
                return Err(KioskError::StockExceeded {
                    product_id,
                    available: stock,
                });
            }
        }

        // Bounded by stock when increasing, by the current quantity otherwise
        self.lines[index].qty = u32::try_from(wanted).unwrap_or(u32::MAX);
        Ok(true)
    }

    /// Remove every line
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price × qty`
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    /// Lines in insertion order
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `product_id`
    #[must_use]
    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
