//! JSON ⇄ BSON conversions
//!
//! Numbers follow the JavaScript driver's storage: integers that fit in 32
//! bits become `Int32`, other integers `Int64`, everything else `Double`.
//! On the way out ObjectIds become hex strings and dates RFC 3339 strings;
//! remaining BSON types use relaxed extended JSON.

use mongodb::bson::{self, Bson};
use serde_json::{Map, Value};
use smart_core::{Document, Filter, Sort, ID_FIELD};

/// Convert a JSON value to BSON
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(to_bson_document(map)),
    }
}

/// Convert a JSON object to a BSON document, preserving key order
pub fn to_bson_document(map: &Map<String, Value>) -> bson::Document {
    map.iter()
        .map(|(key, value)| (key.clone(), json_to_bson(value)))
        .collect()
}

/// Convert a BSON value to JSON
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => Value::Object(from_bson_document(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a BSON document to a JSON object
pub fn from_bson_document(doc: bson::Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

/// Query document for a filter
pub fn filter_to_bson(filter: &Filter) -> bson::Document {
    let mut query = bson::Document::new();
    match filter {
        Filter::All => {}
        Filter::Id(id) => {
            query.insert(ID_FIELD, id.object_id());
        }
        Filter::Eq { field, value } => {
            query.insert(field.clone(), json_to_bson(value));
        }
    }
    query
}

/// Sort specification document
pub fn sort_to_bson(sort: &Sort) -> bson::Document {
    let mut keys = bson::Document::new();
    keys.insert(sort.field.clone(), sort.order.as_i32());
    keys
}
