//! Orders and line items.
//!
//! Orders are written once into the `pedidos` collection and never mutated
//! afterwards. Field names on the wire are the stored document's:
//!
//! ```text
//! { "cliente_id": "...", "cliente": {...}, "items": [{"id": "...", "cantidad": 2}],
//!   "total": 19.98, "fecha": "2025-03-01T12:00:00.000000Z" }
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, Fields, ID_FIELD};
use crate::value_objects::{DocumentId, DomainError};

/// Product reference field of a line item.
pub const ITEM_ID_FIELD: &str = "id";

/// Quantity field of a line item.
pub const ITEM_QUANTITY_FIELD: &str = "cantidad";

// =============================================================================
// Line Item
// =============================================================================

/// One ordered product and how many units were requested.
///
/// Extra fields sent by the caller (name, unit price, ...) are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct LineItem {
    /// Referenced product
    #[serde(rename = "id")]
    pub product_id: DocumentId,
    /// Requested units
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    /// Other caller-provided fields
    #[serde(flatten)]
    pub extra: Fields,
}

impl LineItem {
    /// Create a line item with no extra fields.
    pub fn new(product_id: DocumentId, quantity: u32) -> Self {
        Self { product_id, quantity, extra: Fields::new() }
    }

    /// Decode a line item from a JSON object.
    ///
    /// The quantity may be an integer, a float (truncated toward zero) or a
    /// numeric string.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidLineItem` when the value is not an object,
    /// the product id is missing, or the quantity is negative or not a
    /// number.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut fields) = value else {
            return Err(DomainError::InvalidLineItem("expected an object".to_string()));
        };

        let product_id = match fields.remove(ITEM_ID_FIELD) {
            Some(Value::String(id)) => DocumentId::new(id)
                .map_err(|e| DomainError::InvalidLineItem(e.to_string()))?,
            Some(other) => {
                return Err(DomainError::InvalidLineItem(format!(
                    "product id must be a string, got {}",
                    other
                )))
            },
            None => return Err(DomainError::InvalidLineItem("missing product id".to_string())),
        };

        let quantity = match fields.remove(ITEM_QUANTITY_FIELD) {
            Some(raw) => parse_quantity(&raw)?,
            None => return Err(DomainError::InvalidLineItem("missing cantidad".to_string())),
        };

        Ok(Self { product_id, quantity, extra: fields })
    }
}

impl TryFrom<Value> for LineItem {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn parse_quantity(raw: &Value) -> Result<u32, DomainError> {
    let whole = match raw {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i),
            // `as` saturates; out-of-range values fail the u32 check below
            (None, Some(f)) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    let whole = whole.ok_or_else(|| {
        DomainError::InvalidLineItem(format!("cantidad must be a number, got {}", raw))
    })?;

    u32::try_from(whole).map_err(|_| {
        DomainError::InvalidLineItem(format!("cantidad must be between 0 and {}, got {}", u32::MAX, whole))
    })
}

// =============================================================================
// Order
// =============================================================================

/// A placed order as stored in the orders collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Customer identifier
    #[serde(rename = "cliente_id")]
    pub customer_id: String,
    /// Customer data, stored opaquely
    #[serde(rename = "cliente")]
    pub customer: Fields,
    /// Ordered products
    pub items: Vec<LineItem>,
    /// Order total as sent by the caller
    pub total: f64,
    /// Creation time (UTC)
    #[serde(rename = "fecha", with = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create an order stamped with the current UTC time.
    ///
    /// Items and total are taken as given: no check that the list is
    /// non-empty or that the total matches the items.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidOrder` if `total` is NaN or infinite.
    pub fn new(
        customer_id: impl Into<String>,
        customer: Fields,
        items: Vec<LineItem>,
        total: f64,
    ) -> Result<Self, DomainError> {
        Self::at(customer_id, customer, items, total, Utc::now())
    }

    /// Create an order with an explicit creation time.
    pub fn at(
        customer_id: impl Into<String>,
        customer: Fields,
        items: Vec<LineItem>,
        total: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !total.is_finite() {
            return Err(DomainError::InvalidOrder(format!("total must be finite, got {}", total)));
        }

        Ok(Self {
            customer_id: customer_id.into(),
            customer,
            items,
            total,
            created_at,
        })
    }

    /// Encode as document fields.
    pub fn to_fields(&self) -> Result<Fields, DomainError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(DomainError::InvalidOrder("order did not encode to an object".to_string())),
            Err(e) => Err(DomainError::InvalidOrder(e.to_string())),
        }
    }

    /// Decode an order document.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidOrder` if required fields are missing or
    /// malformed.
    pub fn from_document(doc: &Document) -> Result<Self, DomainError> {
        let mut fields = doc.fields.clone();
        fields.remove(ID_FIELD);
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| DomainError::InvalidOrder(format!("{}: {}", doc.id, e)))
    }

    /// Sum of requested units across all items.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// `fecha` encoding: RFC 3339 with microseconds and `Z`.
///
/// Decoding also accepts timestamps without an offset, read as UTC.
mod fecha {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid fecha: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Tests
// =============================================================================
