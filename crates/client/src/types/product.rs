//! Product domain types.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use shopfront_core::{Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Pack size shown next to the name (e.g. "100 ml").
    pub size: Option<String>,
    /// Selling price: the sale price when one is set, otherwise the list price.
    pub price: Price,
    /// Pre-discount price shown struck through; equals `price` when there is no discount.
    pub original_price: Price,
    /// Average star rating, 0 to 5.
    pub rating: f64,
    pub reviews_count: u32,
    pub category: Option<String>,
    /// Primary image reference as returned by the API (file name or URL).
    pub image: Option<String>,
    pub images: Vec<String>,
    pub before_after_image: Option<String>,
    pub benefits: Vec<String>,
    pub ingredients: Vec<String>,
    /// Directions for use.
    pub direction: Option<String>,
    pub variants: Vec<ProductVariant>,
    pub stock: i64,
    pub is_featured: bool,
    pub sku: Option<String>,
}

/// A purchasable variant of a product, such as a pack size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub label: String,
    pub price: Price,
    /// `None` when the variant's stock is not tracked.
    pub stock: Option<i64>,
    pub image: Option<String>,
}

impl ProductVariant {
    /// Whether the variant can be selected. Only an explicit zero marks it sold out.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.stock != Some(0)
    }
}

impl Product {
    /// Find a variant by label.
    #[must_use]
    pub fn variant(&self, label: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.label == label)
    }

    /// Price charged for the product, or for the chosen variant.
    ///
    /// An unknown variant label falls back to the product price.
    #[must_use]
    pub fn effective_price(&self, variant: Option<&str>) -> Price {
        variant
            .and_then(|label| self.variant(label))
            .map_or(self.price, |v| v.price)
    }

    /// Whether the product, or the chosen variant, can be added to a cart.
    ///
    /// A variant with untracked stock counts as out of stock once chosen.
    /// With variants but none chosen, the product is available if any
    /// variant is selectable.
    #[must_use]
    pub fn is_in_stock(&self, variant: Option<&str>) -> bool {
        if self.variants.is_empty() {
            return self.stock > 0;
        }
        match variant {
            Some(label) => self
                .variant(label)
                .is_some_and(|v| v.stock.unwrap_or(0) > 0),
            None => self.variants.iter().any(ProductVariant::is_selectable),
        }
    }

    /// Whether the product is sold below its original price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_price.amount > self.price.amount
    }

    /// Discount as a whole percentage of the original price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        if !self.is_discounted() || self.original_price.amount.is_zero() {
            return None;
        }
        let saved = (self.original_price.amount - self.price.amount) / self.original_price.amount
            * Decimal::ONE_HUNDRED;
        saved.round().to_u32()
    }
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Server-defined sort key such as `price_asc` or `newest`.
    pub sort: Option<String>,
    /// Only featured products.
    pub featured: bool,
}

impl ProductQuery {
    /// Query-string pairs; empty filters are omitted.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("search", &self.search),
            ("category", &self.category),
            ("sort", &self.sort),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if self.featured {
            pairs.push(("featured", "true".to_string()));
        }
        pairs
    }
}

/// Fields for creating or updating a product. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<VariantInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// A variant in a [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantInput {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub file_name: String,
}
