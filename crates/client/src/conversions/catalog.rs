//! Category, banner and concern conversions.

use serde::Deserialize;
use shopfront_core::{BannerId, CategoryId, ConcernId};

use super::ImageRefs;
use super::loose::{Count, Flag, Text};
use crate::types::{Banner, Category, Concern};

/// Category as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireCategory {
    id: CategoryId,
    #[serde(default)]
    name: Text,
    #[serde(default)]
    description: Text,
    #[serde(flatten)]
    image: ImageRefs,
    #[serde(default)]
    sort_order: Count,
    #[serde(default)]
    is_active: Flag,
}

/// Banner as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireBanner {
    id: BannerId,
    #[serde(default)]
    title: Text,
    #[serde(flatten)]
    image: ImageRefs,
    #[serde(default)]
    link: Text,
    #[serde(default)]
    sort_order: Count,
    #[serde(default)]
    is_active: Flag,
}

/// Concern as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireConcern {
    id: ConcernId,
    #[serde(default)]
    title: Text,
    #[serde(default)]
    name: Text,
    #[serde(flatten)]
    image: ImageRefs,
    #[serde(default)]
    sort_order: Count,
    #[serde(default)]
    is_active: Flag,
}

// Records without an explicit flag are live; the public endpoints only
// return active ones and older rows predate the column.

pub fn convert_category(category: WireCategory) -> Category {
    Category {
        id: category.id,
        name: category.name.0.unwrap_or_default(),
        description: category.description.0,
        image: category.image.first(),
        sort_order: category.sort_order.0.unwrap_or(0),
        is_active: category.is_active.0.unwrap_or(true),
    }
}

pub fn convert_banner(banner: WireBanner) -> Banner {
    Banner {
        id: banner.id,
        title: banner.title.0,
        image: banner.image.first().unwrap_or_default(),
        link: banner.link.0,
        sort_order: banner.sort_order.0.unwrap_or(0),
        is_active: banner.is_active.0.unwrap_or(true),
    }
}

pub fn convert_concern(concern: WireConcern) -> Concern {
    Concern {
        id: concern.id,
        title: concern.title.or(concern.name).0.unwrap_or_default(),
        image: concern.image.first(),
        sort_order: concern.sort_order.0.unwrap_or(0),
        is_active: concern.is_active.0.unwrap_or(true),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_category() {
        let category = convert_category(
            serde_json::from_value(json!({
                "id": 2, "name": "Hair Care", "image_path": "hair.png",
                "sort_order": "3", "is_active": 0
            }))
            .unwrap(),
        );
        assert_eq!(category.id.as_str(), "2");
        assert_eq!(category.image.as_deref(), Some("hair.png"));
        assert_eq!(category.sort_order, 3);
        assert!(!category.is_active);
    }

    #[test]
    fn test_banner_defaults_active() {
        let banner = convert_banner(
            serde_json::from_value(json!({"id": "b1", "image_path": "sale.jpg", "link": "/shop"}))
                .unwrap(),
        );
        assert_eq!(banner.image, "sale.jpg");
        assert!(banner.is_active);
        assert!(banner.title.is_none());
    }

    #[test]
    fn test_concern_name_fallback() {
        let concern = convert_concern(
            serde_json::from_value(json!({"id": 1, "name": "Acne", "is_active": true})).unwrap(),
        );
        assert_eq!(concern.title, "Acne");
    }
}
