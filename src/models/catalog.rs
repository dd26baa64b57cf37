//! Catalog item data model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A purchasable top-up product.
///
/// Catalog items are read-only to the transaction core: an item must be
/// `active` to be purchasable, and its price is copied into the transaction
/// at processing time so later price changes never affect past transactions.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CatalogItem {
    /// Unique identifier for this item
    pub id: Uuid,

    /// Owning category
    pub category_id: Uuid,

    /// Human-readable product name
    pub name: String,

    /// Price in cents; always positive
    pub price_cents: i64,

    /// Whether the item can currently be purchased
    pub active: bool,

    /// Timestamp when the item was created
    pub created_at: DateTime<Utc>,
}
