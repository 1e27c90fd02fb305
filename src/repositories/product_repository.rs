use crate::error::{StoreError, StoreResult};
use crate::models::{NewProduct, Product, ProductUpdate};
use std::collections::HashMap;
use std::sync::RwLock;

struct Inner {
    rows: HashMap<i64, Product>,
    next_id: i64,
}

/// Repository for product listings
pub struct ProductRepository {
    inner: RwLock<Inner>,
}

impl ProductRepository {
    /// Create a new, empty ProductRepository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a new product listing
    pub fn create(&self, input: NewProduct) -> StoreResult<Product> {
        if input.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("title is required".to_string()));
        }
        if input.price <= 0 {
            return Err(StoreError::InvalidInput(format!(
                "price must be positive, got {}",
                input.price
            )));
        }
        if input.quantity <= 0 {
            return Err(StoreError::InvalidInput(format!(
                "quantity must be positive, got {}",
                input.quantity
            )));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("create"))?;

        let id = inner.next_id;
        inner.next_id += 1;
        let now = chrono::Utc::now().naive_utc();

        let product = Product {
            id,
            title: input.title,
            kind: input.kind,
            quality: input.quality,
            quantity: input.quantity,
            price: input.price,
            location: input.location,
            description: input.description,
            image: input.image,
            seller_id: input.seller_id,
            created_at: now,
            updated_at: now,
        };

        inner.rows.insert(id, product.clone());
        Ok(product)
    }

    /// Find a product by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_id"))?;
        Ok(inner.rows.get(&id).cloned())
    }

    /// Snapshot of all listings in insertion order (ascending id)
    pub fn find_all(&self) -> StoreResult<Vec<Product>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_all"))?;

        let mut rows: Vec<Product> = inner.rows.values().cloned().collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    /// Apply a partial update to a listing
    ///
    /// Returns the updated product, or `None` when the id is unknown.
    /// Updated prices and quantities must stay positive.
    pub fn update(&self, id: i64, updates: ProductUpdate) -> StoreResult<Option<Product>> {
        if let Some(price) = updates.price {
            if price <= 0 {
                return Err(StoreError::InvalidInput(format!(
                    "price must be positive, got {}",
                    price
                )));
            }
        }
        if let Some(quantity) = updates.quantity {
            if quantity <= 0 {
                return Err(StoreError::InvalidInput(format!(
                    "quantity must be positive, got {}",
                    quantity
                )));
            }
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;

        let Some(product) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = updates.title {
            product.title = title;
        }
        if let Some(kind) = updates.kind {
            product.kind = kind;
        }
        if let Some(quality) = updates.quality {
            product.quality = quality;
        }
        if let Some(quantity) = updates.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = updates.price {
            product.price = price;
        }
        if let Some(location) = updates.location {
            product.location = location;
        }
        if let Some(description) = updates.description {
            product.description = Some(description);
        }
        if let Some(image) = updates.image {
            product.image = Some(image);
        }
        product.updated_at = chrono::Utc::now().naive_utc();

        Ok(Some(product.clone()))
    }

    /// Delete a listing; returns whether anything was removed
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;
        Ok(inner.rows.remove(&id).is_some())
    }
}

impl Default for ProductRepository {
    fn default() -> Self {
        Self::new()
    }
}
