//! Products and stock arithmetic.
//!
//! Product documents are loosely typed in storage: `precio` and `stock` may
//! arrive as numbers, numeric strings or garbage. Reads coerce them, and a
//! malformed value becomes `0.0` / `0` instead of failing the read.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::document::{Document, Fields};
use crate::value_objects::DocumentId;

/// Price field of a product document.
pub const PRICE_FIELD: &str = "precio";

/// Stock field of a product document.
pub const STOCK_FIELD: &str = "stock";

/// Display name field of a product document.
pub const NAME_FIELD: &str = "nombre";

// =============================================================================
// Coercion
// =============================================================================

/// Coerce a stored value to a price.
///
/// Numbers keep their value, strings are trimmed and parsed, booleans map to
/// `1.0` / `0.0`. Everything else, and any non-finite result, is `0.0`.
pub fn coerce_price(value: &Value) -> f64 {
    let price = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };

    if price.is_finite() {
        price
    } else {
        0.0
    }
}

/// Coerce a stored value to a stock level.
///
/// Integers keep their value, floats truncate toward zero, strings are
/// trimmed and parsed as integers, booleans map to `1` / `0`. Everything else
/// is `0`. Out-of-range values saturate.
pub fn coerce_stock(value: &Value) -> i64 {
    match value {
        Value::Number(n) => number_to_stock(n),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn number_to_stock(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        return i;
    }
    if n.as_u64().is_some() {
        return i64::MAX;
    }
    match n.as_f64() {
        // `as` saturates at the i64 bounds
        Some(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Rewrite `precio` and `stock` in place with their coerced values.
///
/// Absent fields stay absent.
pub fn normalize_product(fields: &mut Fields) {
    if let Some(price) = fields.get_mut(PRICE_FIELD) {
        let coerced = coerce_price(price);
        *price = Number::from_f64(coerced).map(Value::Number).unwrap_or_else(|| Value::from(0.0));
    }
    if let Some(stock) = fields.get_mut(STOCK_FIELD) {
        *stock = Value::from(coerce_stock(stock));
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Outcome of one floored stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    /// Stock read before the decrement (after coercion)
    pub previous: i64,
    /// Stock written by the decrement
    pub current: i64,
}

impl StockChange {
    /// Compute `max(0, previous - quantity)`.
    pub fn apply(previous: i64, quantity: u32) -> Self {
        let current = previous.saturating_sub(i64::from(quantity)).max(0);
        Self { previous, current }
    }

    /// Units actually removed from stock.
    pub fn removed(&self) -> i64 {
        (self.previous - self.current).max(0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Typed view of a document in the products collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: DocumentId,
    /// Display name, when stored as a string
    pub nombre: Option<String>,
    /// Unit price
    pub precio: f64,
    /// Units in stock
    pub stock: i64,
    /// Remaining fields, untouched
    #[serde(flatten)]
    pub extra: Fields,
}

impl Product {
    /// Build the typed view of a product document.
    ///
    /// Never fails: missing or malformed `precio` / `stock` read as zero.
    pub fn from_document(doc: Document) -> Self {
        let Document { id, mut fields } = doc;

        let precio = fields.remove(PRICE_FIELD).map(|v| coerce_price(&v)).unwrap_or(0.0);
        let stock = fields.remove(STOCK_FIELD).map(|v| coerce_stock(&v)).unwrap_or(0);
        let nombre = match fields.remove(NAME_FIELD) {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                // Keep non-string names as they were stored
                fields.insert(NAME_FIELD.to_string(), other);
                None
            },
            None => None,
        };
        fields.remove(crate::document::ID_FIELD);

        Self { id, nombre, precio, stock, extra: fields }
    }

    /// Convert back into a storable document.
    pub fn into_document(self) -> Document {
        let mut fields = self.extra;
        if let Some(nombre) = self.nombre {
            fields.insert(NAME_FIELD.to_string(), Value::String(nombre));
        }
        fields.insert(PRICE_FIELD.to_string(), Value::from(self.precio));
        fields.insert(STOCK_FIELD.to_string(), Value::from(self.stock));
        Document::new(self.id, fields)
    }
}

// =============================================================================
// Tests
// =============================================================================
