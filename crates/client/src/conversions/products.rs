//! Product conversions.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::Value;
use shopfront_core::{Price, ProductId};

use super::loose::{Amount, Count, Flag, StringList, Text};
use super::{ImageRefs, nested};
use crate::types::{Product, ProductVariant};

/// Product as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireProduct {
    id: ProductId,
    #[serde(default)]
    name: Text,
    #[serde(default)]
    description: Text,
    #[serde(default)]
    product_description: Text,
    #[serde(default, rename = "productDescription")]
    product_description_camel: Text,
    #[serde(default)]
    size: Text,
    #[serde(default)]
    price: Amount,
    #[serde(default)]
    sale_price: Amount,
    #[serde(default)]
    original_price: Amount,
    #[serde(default)]
    rating: Amount,
    #[serde(default)]
    average_rating: Amount,
    #[serde(default)]
    reviews_count: Count,
    #[serde(default)]
    review_count: Count,
    #[serde(default)]
    category: Text,
    #[serde(flatten)]
    image: ImageRefs,
    #[serde(default)]
    images: StringList,
    #[serde(default)]
    before_after_image: Text,
    #[serde(default)]
    benefits: StringList,
    #[serde(default)]
    ingredients: StringList,
    #[serde(default)]
    direction: Text,
    #[serde(default)]
    options: Option<Value>,
    #[serde(default)]
    stock: Count,
    #[serde(default)]
    is_featured: Flag,
    #[serde(default)]
    sku: Text,
}

#[derive(Debug, Deserialize)]
struct WireVariant {
    #[serde(default)]
    label: Text,
    #[serde(default)]
    price: Amount,
    #[serde(default)]
    stock: Count,
    #[serde(default)]
    image: Text,
}

pub fn convert_product(product: WireProduct) -> Product {
    let list_price = product.price.or_zero();
    let price = product.sale_price.nonzero().unwrap_or(list_price);
    let original_price = product
        .original_price
        .nonzero()
        .or_else(|| product.price.nonzero())
        .unwrap_or(Decimal::ZERO);

    let rating = product
        .rating
        .nonzero()
        .or_else(|| product.average_rating.nonzero())
        .and_then(|r| r.to_f64())
        .map_or(0.0, |r| r.clamp(0.0, 5.0));

    let reviews_count = product
        .reviews_count
        .0
        .or(product.review_count.0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    Product {
        name: product.name.0.unwrap_or_default(),
        description: product
            .description
            .or(product.product_description)
            .or(product.product_description_camel)
            .0,
        size: product.size.0,
        price: Price::from_amount(price),
        original_price: Price::from_amount(original_price),
        rating,
        reviews_count,
        category: product.category.0,
        image: product.image.first(),
        images: product.images.0,
        before_after_image: product.before_after_image.0,
        benefits: product.benefits.0,
        ingredients: product.ingredients.0,
        direction: product.direction.0,
        variants: product.options.map(convert_variants).unwrap_or_default(),
        stock: product.stock.0.unwrap_or(0),
        is_featured: product.is_featured.0.unwrap_or(false),
        sku: product.sku.0,
        id: product.id,
    }
}

/// Variants arrive as an array or as the JSON text of one.
fn convert_variants(options: Value) -> Vec<ProductVariant> {
    let items = match options {
        Value::Array(items) => items,
        text @ Value::String(_) => nested::<Vec<Value>>(text).unwrap_or_default(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<WireVariant>(item).ok())
        .filter_map(|variant| {
            Some(ProductVariant {
                label: variant.label.0?,
                price: Price::from_amount(variant.price.or_zero()),
                stock: variant.stock.0,
                image: variant.image.0,
            })
        })
        .collect()
}
