//! # Response Envelopes
//!
//! The backend wraps every success in `{ message, data }` and every failure
//! in `{ message }`. List endpoints disagree on pagination shape; all of them
//! are folded into one [`Page<T>`] here so callers never branch on it.
//!
//! ## Accepted List Shapes
//! ```text
//! { items: [...], total, page, limit, totalPages }
//! { data:  [...], total, page, limit, totalPages }
//! { data:  [...], meta: { page, take, itemCount, pageCount } }
//! [ ... ]
//! ```
//!
//! Missing totals fall back to what the item array itself says.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Success Envelope
// =============================================================================

/// `{ message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Parses a success body and returns its `data`.
///
/// A body without a `data` key is taken as the payload itself; an empty
/// body reads as JSON `null`.
pub fn unwrap_data<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)?
    };

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

// =============================================================================
// Messages
// =============================================================================

/// Extracts the `message` of an envelope body (error or success).
///
/// Validation failures arrive as an array of strings and are joined with
/// `, `. Returns `None` for non-JSON bodies and blank messages.
pub fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("message")? {
        Value::String(text) => text.trim().to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}

// =============================================================================
// Page
// =============================================================================

/// One page of a list endpoint, whatever shape the backend used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// A single page holding every item.
    pub fn from_items(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Page {
            items,
            total: count,
            page: 1,
            limit: count,
            total_pages: pages_for(count, count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalises any of the accepted list shapes.
    pub fn from_value(value: Value) -> ClientResult<Self> {
        let map = match value {
            Value::Array(items) => return Ok(Page::from_items(decode_items(items)?)),
            Value::Object(map) => map,
            other => {
                return Err(ClientError::InvalidResponse(format!(
                    "expected a list, got {}",
                    kind_of(&other)
                )))
            }
        };

        let items = match map.get("items").or_else(|| map.get("data")) {
            Some(Value::Array(items)) => decode_items(items.clone())?,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ClientError::InvalidResponse(format!(
                    "expected an item array, got {}",
                    kind_of(other)
                )))
            }
        };
        let count = items.len() as u64;

        let (total, page, limit, total_pages) = match map.get("meta") {
            Some(Value::Object(meta)) => (
                number(meta, "itemCount"),
                number(meta, "page"),
                number(meta, "take"),
                number(meta, "pageCount"),
            ),
            _ => (
                number(&map, "total"),
                number(&map, "page"),
                number(&map, "limit"),
                number(&map, "totalPages"),
            ),
        };

        let total = total.unwrap_or(count);
        let limit = limit.unwrap_or(count);
        Ok(Page {
            items,
            total,
            page: page.unwrap_or(1),
            limit,
            total_pages: total_pages.unwrap_or_else(|| pages_for(total, limit)),
        })
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Page::from_value(value).map_err(D::Error::custom)
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> ClientResult<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ClientError::from))
        .collect()
}

/// Reads a non-negative count that may arrive as a number or a numeric string.
fn number(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn pages_for(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        u64::from(total > 0)
    } else {
        total.div_ceil(limit)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Row {
        id: u32,
    }

    fn rows(ids: &[u32]) -> Vec<Row> {
        ids.iter().map(|&id| Row { id }).collect()
    }

    #[test]
    fn test_items_shape() {
        let page: Page<Row> = serde_json::from_value(json!({
            "items": [{"id": 1}, {"id": 2}],
            "total": 12, "page": 2, "limit": 2, "totalPages": 6
        }))
        .unwrap();
        assert_eq!(page.items, rows(&[1, 2]));
        assert_eq!((page.total, page.page, page.limit, page.total_pages), (12, 2, 2, 6));
        assert!(page.has_next());
    }

    #[test]
    fn test_data_shape_with_flat_totals() {
        let page: Page<Row> = serde_json::from_value(json!({
            "data": [{"id": 7}],
            "total": "41", "page": 5, "limit": 10
        }))
        .unwrap();
        assert_eq!(page.items, rows(&[7]));
        assert_eq!(page.total, 41);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn test_meta_shape() {
        let page: Page<Row> = serde_json::from_value(json!({
            "data": [{"id": 1}, {"id": 2}, {"id": 3}],
            "meta": {"page": 1, "take": 3, "itemCount": 9, "pageCount": 3}
        }))
        .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!((page.total, page.page, page.limit, page.total_pages), (9, 1, 3, 3));
    }

    #[test]
    fn test_bare_array_defaults_from_count() {
        let page: Page<Row> = serde_json::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!((page.total, page.page, page.limit, page.total_pages), (2, 1, 2, 1));
        assert!(!page.has_next());

        let empty: Page<Row> = serde_json::from_value(json!([])).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_rejects_non_list() {
        assert!(Page::<Row>::from_value(json!("nope")).is_err());
        assert!(Page::<Row>::from_value(json!({"items": 3})).is_err());
    }

    #[test]
    fn test_unwrap_data() {
        let row: Row = unwrap_data(br#"{"message":"ok","data":{"id":4}}"#).unwrap();
        assert_eq!(row, Row { id: 4 });

        let bare: Row = unwrap_data(br#"{"id":5}"#).unwrap();
        assert_eq!(bare, Row { id: 5 });

        let nothing: Option<Row> = unwrap_data(b"").unwrap();
        assert!(nothing.is_none());

        let page: Page<Row> =
            unwrap_data(br#"{"message":"ok","data":{"items":[{"id":1}],"total":1}}"#).unwrap();
        assert_eq!(page.items, rows(&[1]));
    }

    #[test]
    fn test_message_forms() {
        assert_eq!(
            extract_message(br#"{"message":"SKU already exists"}"#).as_deref(),
            Some("SKU already exists")
        );
        assert_eq!(
            extract_message(br#"{"message":["name is required","price must be positive"]}"#)
                .as_deref(),
            Some("name is required, price must be positive")
        );
        assert_eq!(extract_message(br#"{"message":""}"#), None);
        assert_eq!(extract_message(br#"{"error":"x"}"#), None);
        assert_eq!(extract_message(b"<html>502</html>"), None);
    }
}
