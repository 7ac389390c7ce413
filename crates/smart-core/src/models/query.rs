//! Query filters and find options

use std::cmp::Ordering;

use serde_json::Value;

use super::document::{Document, DocumentId, ID_FIELD};

/// Selects the documents an operation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection
    All,
    /// The document with this identifier
    Id(DocumentId),
    /// Documents whose `field` equals `value` exactly
    Eq { field: String, value: Value },
}

impl Filter {
    /// Exact-match filter on a single field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Exact match when `value` is present and non-empty, otherwise everything.
    ///
    /// Query strings like `?email=` are treated as if the parameter were absent.
    pub fn eq_if_present(field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Filter::eq(field, v),
            _ => Filter::All,
        }
    }

    /// Evaluate the filter against a document.
    ///
    /// Equality against `null` also matches a missing field, as document
    /// stores do.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => matches!(doc.get(ID_FIELD), Some(Value::String(s)) if *s == id.to_hex()),
            Filter::Eq { field, value } => match (doc.get(field), value) {
                (None, Value::Null) => true,
                (Some(actual), expected) => actual == expected,
                (None, _) => false,
            },
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Numeric form used by document-store sort specifications
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Single-field sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Options for `find`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by `field`, highest first
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order: SortOrder::Descending,
        });
        self
    }

    /// Sort by `field`, lowest first
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order: SortOrder::Ascending,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort and truncate documents in place
    pub fn apply(&self, docs: &mut Vec<Document>) {
        if let Some(sort) = &self.sort {
            // stable, so ties keep insertion order
            docs.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
    }
}

/// Cross-type rank: missing/null < numbers < strings < objects < arrays < booleans
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order over JSON field values, used for sorting
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
