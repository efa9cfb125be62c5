//! Schema-less documents.
//!
//! A document is a JSON object stored under a collection and an identifier.
//! The identifier lives outside the fields and is only added as an `id`
//! field when the document is rendered for callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::DocumentId;

/// Field name → value mapping of a document.
pub type Fields = serde_json::Map<String, Value>;

/// Field added to rendered documents to carry the identifier.
pub const ID_FIELD: &str = "id";

/// A stored document with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier within its collection
    pub id: DocumentId,
    /// Document contents
    pub fields: Fields,
}

impl Document {
    /// Create a document from an identifier and its fields.
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Get a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Merge a partial update into the fields.
    ///
    /// Top-level keys replace existing values. A dotted key such as
    /// `"cliente.nombre"` addresses a nested object field; intermediate
    /// objects are created when missing and non-object intermediates are
    /// replaced by objects.
    pub fn merge(&mut self, patch: Fields) {
        merge_fields(&mut self.fields, patch);
    }

    /// Render as a JSON object with the identifier under `id`.
    ///
    /// An existing `id` field in the contents is overwritten.
    pub fn into_json(self) -> Value {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.into()));
        Value::Object(fields)
    }
}

/// Merge `patch` into `target` with dotted-path semantics.
pub fn merge_fields(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        set_path(target, &key, value);
    }
}

fn set_path(target: &mut Fields, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        },
        Some((head, rest)) => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Fields::new()));
            if !slot.is_object() {
                *slot = Value::Object(Fields::new());
            }
            if let Value::Object(nested) = slot {
                set_path(nested, rest, value);
            }
        },
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_top_level() {
        let mut doc = Document::new(
            DocumentId::new("p1").unwrap(),
            fields(json!({"nombre": "Café", "stock": 3})),
        );

        doc.merge(fields(json!({"stock": 1, "precio": 9.99})));

        assert_eq!(doc.get("nombre"), Some(&json!("Café")));
        assert_eq!(doc.get("stock"), Some(&json!(1)));
        assert_eq!(doc.get("precio"), Some(&json!(9.99)));
    }

    #[test]
    fn test_merge_dotted_path() {
        let mut doc = Document::new(
            DocumentId::new("o1").unwrap(),
            fields(json!({"cliente": {"nombre": "Ana", "ciudad": "Lima"}, "total": 3})),
        );

        doc.merge(fields(json!({"cliente.nombre": "Eva", "envio.estado": "listo"})));

        assert_eq!(doc.get("cliente"), Some(&json!({"nombre": "Eva", "ciudad": "Lima"})));
        assert_eq!(doc.get("envio"), Some(&json!({"estado": "listo"})));
    }

    #[test]
    fn test_merge_dotted_path_replaces_scalar_parent() {
        let mut doc = Document::new(DocumentId::new("x").unwrap(), fields(json!({"a": 1})));

        doc.merge(fields(json!({"a.b": true})));

        assert_eq!(doc.get("a"), Some(&json!({"b": true})));
    }

    #[test]
    fn test_into_json_carries_id() {
        let doc = Document::new(DocumentId::new("abc").unwrap(), fields(json!({"k": "v"})));

        assert_eq!(doc.into_json(), json!({"k": "v", "id": "abc"}));
    }

    #[test]
    fn test_empty_document_is_not_absent() {
        let doc = Document::new(DocumentId::new("empty").unwrap(), Fields::new());

        assert!(doc.fields.is_empty());
        assert_eq!(doc.into_json(), json!({"id": "empty"}));
    }
}
