//! Conversions from wire shapes to canonical types.
//!
//! The server's responses vary by endpoint and by age of the record: the
//! same field can arrive under two or three keys, amounts as numbers or
//! strings, nested objects as JSON text. The `Wire*` structs accept every
//! known spelling and the `convert_*` functions fold them into one
//! canonical type.

mod catalog;
mod content;
mod loose;
mod orders;
mod products;
mod reviews;
mod users;

pub use catalog::{WireBanner, WireCategory, WireConcern, convert_banner, convert_category, convert_concern};
pub use content::{
    WireContactMessage, WirePage, convert_contact_message, convert_page, convert_wishlist_item,
};
pub use orders::{
    WireDashboardStats, WireOrder, WireSalesChart, convert_dashboard_stats, convert_order,
    convert_sales_chart,
};
pub use products::{WireProduct, convert_product};
pub use reviews::{WireReview, convert_review};
pub use users::{
    WireAddress, WireUserProfile, convert_address, convert_admin_user,
    convert_user_profile,
};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use loose::Text;

use crate::error::ApiError;

/// Image reference under any of its four spellings.
#[derive(Debug, Default, Deserialize)]
struct ImageRefs {
    #[serde(default, rename = "imageUrl")]
    image_url_camel: Text,
    #[serde(default)]
    image_url: Text,
    #[serde(default, rename = "imagePath")]
    image_path_camel: Text,
    #[serde(default)]
    image_path: Text,
}

impl ImageRefs {
    fn first(self) -> Option<String> {
        self.image_url_camel
            .or(self.image_url)
            .or(self.image_path_camel)
            .or(self.image_path)
            .0
    }
}

/// Elements of a list response. `null` is an empty list; any other
/// non-array body is a decode error.
pub fn list_items(value: Value) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Decode(format!(
            "expected a list, got {}",
            json_kind(&other)
        ))),
    }
}

/// Convert every element of a list response, skipping elements that do not
/// match the wire shape.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the body is not a list.
pub fn convert_list<W, T>(
    value: Value,
    what: &'static str,
    convert: impl Fn(W) -> T,
) -> Result<Vec<T>, ApiError>
where
    W: DeserializeOwned,
{
    Ok(convert_items(list_items(value)?, what, convert))
}

/// As [`convert_list`], for a list nested inside a larger object. A field
/// of the wrong kind is logged and read as empty.
fn nested_list<W, T>(value: Value, what: &'static str, convert: impl Fn(W) -> T) -> Vec<T>
where
    W: DeserializeOwned,
{
    match list_items(value) {
        Ok(items) => convert_items(items, what, convert),
        Err(e) => {
            tracing::warn!(what, error = %e, "Ignoring malformed nested list");
            Vec::new()
        }
    }
}

fn convert_items<W, T>(items: Vec<Value>, what: &'static str, convert: impl Fn(W) -> T) -> Vec<T>
where
    W: DeserializeOwned,
{
    let total = items.len();
    let converted: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<W>(item) {
            Ok(wire) => Some(convert(wire)),
            Err(e) => {
                tracing::warn!(what, error = %e, "Skipping malformed list element");
                None
            }
        })
        .collect();

    if converted.len() < total {
        tracing::warn!(what, total, kept = converted.len(), "Dropped malformed list elements");
    }
    converted
}

/// Decode a value that may be an object or a JSON-encoded object string.
fn nested<W: DeserializeOwned>(value: Value) -> Option<W> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        Value::String(s) if !s.trim().is_empty() => serde_json::from_str(&s).ok(),
        _ => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_image_refs_precedence() {
        let refs: ImageRefs =
            serde_json::from_value(json!({"image_path": "b.png", "imageUrl": "a.png"})).unwrap();
        assert_eq!(refs.first().as_deref(), Some("a.png"));

        let refs: ImageRefs = serde_json::from_value(json!({"imagePath": "c.png"})).unwrap();
        assert_eq!(refs.first().as_deref(), Some("c.png"));
    }

    #[test]
    fn test_list_items_rejects_non_array() {
        let err = list_items(json!({"message": "maintenance"})).unwrap_err();
        assert!(matches!(&err, ApiError::Decode(msg) if msg.contains("object")));
        assert!(list_items(json!("nope")).is_err());
        assert!(list_items(Value::Null).unwrap().is_empty());
        assert_eq!(list_items(json!([1, 2])).unwrap().len(), 2);
    }

    #[test]
    fn test_nested_list_of_wrong_kind_is_empty() {
        let names: Vec<String> = nested_list(json!({"a": 1}), "named", |s: String| s);
        assert!(names.is_empty());
    }

    #[test]
    fn test_convert_list_skips_malformed() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }
        let names = convert_list(
            json!([{"name": "a"}, {"nope": 1}, {"name": "b"}]),
            "named",
            |n: Named| n.name,
        )
        .unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_accepts_json_text() {
        #[derive(Deserialize)]
        struct City {
            city: String,
        }
        let from_text: City = nested(json!("{\"city\": \"Pune\"}")).unwrap();
        assert_eq!(from_text.city, "Pune");
        assert!(nested::<City>(json!(42)).is_none());
    }
}
