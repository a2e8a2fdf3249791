//! Wishlist, contact message and page conversions.

use serde::Deserialize;
use serde_json::Value;
use shopfront_core::{ContactMessageId, PageId, ProductId, WishlistItemId};

use super::loose::{Flag, Text, Timestamp};
use super::products::{WireProduct, convert_product};
use crate::types::{ContactMessage, PageContent, WishlistItem};

#[derive(Debug, Deserialize)]
struct WireWishlistEntry {
    #[serde(default)]
    id: Option<WishlistItemId>,
    #[serde(default)]
    product_id: Option<ProductId>,
    #[serde(default, rename = "Product")]
    product: Option<Value>,
}

/// Convert one wishlist entry.
///
/// Entries come either as a join row with the product embedded under
/// `Product`, or as the bare product itself. Returns `None` when no product
/// ID can be found.
pub fn convert_wishlist_item(value: Value) -> Option<WishlistItem> {
    let entry: WireWishlistEntry = serde_json::from_value(value.clone()).ok()?;

    match (entry.product, entry.product_id) {
        (Some(product), product_id) => {
            let product = serde_json::from_value::<WireProduct>(product)
                .ok()
                .map(convert_product);
            let product_id = product_id.or_else(|| product.as_ref().map(|p| p.id.clone()))?;
            Some(WishlistItem {
                id: entry.id,
                product_id,
                product,
            })
        }
        (None, Some(product_id)) => Some(WishlistItem {
            id: entry.id,
            product_id,
            product: None,
        }),
        (None, None) => {
            let product = convert_product(serde_json::from_value::<WireProduct>(value).ok()?);
            Some(WishlistItem {
                id: None,
                product_id: product.id.clone(),
                product: Some(product),
            })
        }
    }
}

/// Contact message as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireContactMessage {
    id: ContactMessageId,
    #[serde(default)]
    name: Text,
    #[serde(default)]
    email: Text,
    #[serde(default)]
    message: Text,
    #[serde(default)]
    is_read: Flag,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Timestamp,
    #[serde(default)]
    created_at: Timestamp,
    #[serde(default, rename = "updatedAt")]
    updated_at_camel: Timestamp,
    #[serde(default)]
    updated_at: Timestamp,
}

pub fn convert_contact_message(msg: WireContactMessage) -> ContactMessage {
    ContactMessage {
        id: msg.id,
        name: msg.name.0.unwrap_or_default(),
        email: msg.email.0.unwrap_or_default(),
        message: msg.message.0.unwrap_or_default(),
        is_read: msg.is_read.0.unwrap_or(false),
        created_at: msg.created_at_camel.or(msg.created_at).0,
        updated_at: msg.updated_at_camel.or(msg.updated_at).0,
    }
}

/// Static page as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WirePage {
    #[serde(default)]
    id: Option<PageId>,
    #[serde(default)]
    slug: Text,
    #[serde(default)]
    title: Text,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "updatedAt")]
    updated_at_camel: Timestamp,
    #[serde(default)]
    updated_at: Timestamp,
}

pub fn convert_page(page: WirePage) -> PageContent {
    PageContent {
        id: page.id,
        slug: page.slug.0.unwrap_or_default(),
        title: page.title.0.unwrap_or_default(),
        // Content is markup; keep surrounding whitespace as authored.
        content: page.content.unwrap_or_default(),
        updated_at: page.updated_at_camel.or(page.updated_at).0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wishlist_join_row_with_product() {
        let item = convert_wishlist_item(json!({
            "id": 11,
            "product_id": 7,
            "Product": {"id": 7, "name": "Aloe Gel", "price": 240}
        }))
        .unwrap();
        assert_eq!(item.id.unwrap().as_str(), "11");
        assert_eq!(item.product_id.as_str(), "7");
        assert_eq!(item.product.unwrap().name, "Aloe Gel");
    }

    #[test]
    fn test_wishlist_bare_product() {
        let item = convert_wishlist_item(json!({"id": 7, "name": "Aloe Gel", "price": 240})).unwrap();
        assert!(item.id.is_none());
        assert_eq!(item.product_id.as_str(), "7");
        assert!(item.product.is_some());
    }

    #[test]
    fn test_wishlist_row_without_product() {
        let item = convert_wishlist_item(json!({"id": 11, "product_id": "p-7"})).unwrap();
        assert_eq!(item.product_id.as_str(), "p-7");
        assert!(item.product.is_none());
    }

    #[test]
    fn test_wishlist_unusable_entry() {
        assert!(convert_wishlist_item(json!({"note": "x"})).is_none());
        assert!(convert_wishlist_item(json!("p-7")).is_none());
    }

    #[test]
    fn test_contact_message() {
        let msg = convert_contact_message(
            serde_json::from_value(json!({
                "id": 1, "name": "Ravi", "email": "r@x.in", "message": "Hi",
                "is_read": 1, "createdAt": "2024-01-01T00:00:00Z"
            }))
            .unwrap(),
        );
        assert!(msg.is_read);
        assert!(msg.created_at.is_some());
        assert!(msg.updated_at.is_none());
    }

    #[test]
    fn test_page_keeps_content() {
        let page = convert_page(
            serde_json::from_value(json!({"slug": "about", "title": "About", "content": "<p>Hi</p>\n"}))
                .unwrap(),
        );
        assert!(page.id.is_none());
        assert_eq!(page.content, "<p>Hi</p>\n");
    }
}
