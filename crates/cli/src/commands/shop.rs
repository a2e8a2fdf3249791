//! Catalog browsing, order history and tracking.

use std::io::Write;

use shopfront_client::{ApiClient, Order, Product, ProductQuery, ReviewSummary};
use shopfront_core::{DeliveryStatus, Email, OrderId, ProductId};

use super::{CliError, require_session};

/// List products.
///
/// # Errors
///
/// Returns `CliError::Api` if the request fails.
pub async fn products(
    client: &ApiClient,
    query: &ProductQuery,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let products = client.products(query).await?;
    if products.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }
    for product in &products {
        writeln!(out, "{}", product_line(product))?;
    }
    Ok(())
}

/// Show one product with its variants and review summary.
///
/// # Errors
///
/// Returns `CliError::Api` if the product cannot be loaded.
pub async fn product(client: &ApiClient, id: &ProductId, out: &mut impl Write) -> Result<(), CliError> {
    let (product, reviews) = tokio::join!(client.product(id), client.product_reviews(id));
    let product = product?;

    writeln!(out, "{}", product.name)?;
    if let Some(size) = &product.size {
        writeln!(out, "Size:     {size}")?;
    }
    match product.discount_percent() {
        Some(off) => writeln!(
            out,
            "Price:    {} (was {}, {off}% off)",
            product.price, product.original_price
        )?,
        None => writeln!(out, "Price:    {}", product.price)?,
    }
    if let Some(category) = &product.category {
        writeln!(out, "Category: {category}")?;
    }
    writeln!(
        out,
        "Stock:    {}",
        if product.is_in_stock(None) { "in stock" } else { "out of stock" }
    )?;
    if let Some(image) = &product.image {
        writeln!(out, "Image:    {}", client.image_url(image))?;
    }

    for variant in &product.variants {
        let marker = if variant.is_selectable() { "" } else { " (sold out)" };
        writeln!(out, "  - {}: {}{marker}", variant.label, variant.price)?;
    }

    // Reviews are optional decoration; a failure here should not hide the product.
    match reviews {
        Ok(reviews) => {
            let summary = ReviewSummary::from_reviews(&reviews, product.rating);
            writeln!(out, "Rating:   {:.1} ({} reviews)", summary.average, summary.count)?;
            for (stars, percent) in summary.distribution {
                writeln!(out, "  {stars}★ {percent:>3}%")?;
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not load reviews"),
    }

    if let Some(description) = &product.description {
        writeln!(out)?;
        writeln!(out, "{description}")?;
    }
    Ok(())
}

/// Show where an order is on the delivery timeline.
///
/// # Errors
///
/// Returns `CliError::Api` if no order matches the ID and email.
pub async fn track(
    client: &ApiClient,
    order_id: &OrderId,
    email: &Email,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let order = client.track_order(order_id, email.as_str()).await?;
    writeln!(out, "Order #{} - {}", order.id, order.summary(3))?;
    writeln!(out, "Total: {} ({})", order.total_amount, order.payment_status)?;
    for line in tracking_timeline(order.delivery_status) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// List the signed-in customer's orders.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a session, or `CliError::Api` if
/// the request fails.
pub async fn orders(client: &ApiClient, out: &mut impl Write) -> Result<(), CliError> {
    require_session(client)?;
    let orders = client.my_orders().await?;
    if orders.is_empty() {
        writeln!(out, "No orders yet")?;
    }
    for order in &orders {
        writeln!(out, "{}", order_line(order))?;
    }
    Ok(())
}

fn product_line(product: &Product) -> String {
    let stock = if product.is_in_stock(None) { "" } else { "  [sold out]" };
    let featured = if product.is_featured { "  *" } else { "" };
    format!("{}\t{}\t{}{stock}{featured}", product.id, product.name, product.price)
}

pub(crate) fn order_line(order: &Order) -> String {
    let date = order
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "#{}\t{date}\t{}\t{} item(s)\t{}\t{}",
        order.id,
        order.total_amount,
        order.item_count(),
        order.delivery_status.label(),
        order.summary(2)
    )
}

/// One line per tracking step, checked up to the current one.
fn tracking_timeline(status: DeliveryStatus) -> Vec<String> {
    if status == DeliveryStatus::Cancelled {
        return vec!["[x] Cancelled".to_string()];
    }
    let current = status.tracking_step();
    DeliveryStatus::TRACKING_STEPS
        .iter()
        .enumerate()
        .map(|(step, s)| {
            let mark = if step <= current { 'x' } else { ' ' };
            format!("[{mark}] {}", s.label())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_timeline_marks_completed_steps() {
        let lines = tracking_timeline(DeliveryStatus::Shipped);
        assert_eq!(
            lines,
            vec![
                "[x] Ordered",
                "[x] Order Ready",
                "[x] Shipped",
                "[ ] Out for Delivery",
                "[ ] Delivered",
            ]
        );
    }

    #[test]
    fn test_tracking_timeline_cancelled() {
        assert_eq!(tracking_timeline(DeliveryStatus::Cancelled), vec!["[x] Cancelled"]);
    }

    #[tokio::test]
    async fn test_orders_requires_session() {
        let client = ApiClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            orders(&client, &mut out).await,
            Err(CliError::NotSignedIn)
        ));
    }
}
