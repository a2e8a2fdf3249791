//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{DeliveryStatus, OrderId, OrderItemId, PaymentStatus, Price, ProductId};

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Price,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub payment_method: Option<String>,
    /// Payment gateway order reference.
    pub razorpay_order_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
    /// Who placed the order, when the listing includes it.
    pub customer: Option<OrderCustomer>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals. May differ from `total_amount`, which includes
    /// shipping and discounts.
    #[must_use]
    pub fn items_total(&self) -> Price {
        let amount = self
            .items
            .iter()
            .map(|item| item.line_total().amount)
            .sum::<Decimal>();
        Price::new(amount, self.total_amount.currency_code)
    }

    /// Short product summary such as "Neem Face Wash, Aloe Gel +1 more".
    #[must_use]
    pub fn summary(&self, max_names: usize) -> String {
        let names: Vec<&str> = self
            .items
            .iter()
            .take(max_names)
            .map(|item| item.product_name.as_deref().unwrap_or("Product"))
            .collect();
        let mut summary = names.join(", ");
        let rest = self.items.len().saturating_sub(max_names);
        if rest > 0 {
            summary.push_str(&format!(" +{rest} more"));
        }
        summary
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<OrderItemId>,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub variant_label: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    /// Line subtotal as reported by the server.
    pub subtotal: Option<Price>,
}

impl OrderItem {
    /// The reported subtotal, or quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.subtotal.unwrap_or_else(|| {
            Price::new(
                self.unit_price.amount * Decimal::from(self.quantity),
                self.unit_price.currency_code,
            )
        })
    }
}

/// Where an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    /// Printable address lines, skipping empty parts.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = [&self.name, &self.line1, &self.line2, &self.landmark]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        let locality = [&self.city, &self.state]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let locality = match &self.pincode {
            Some(pin) if locality.is_empty() => pin.clone(),
            Some(pin) => format!("{locality} {pin}"),
            None => locality,
        };
        if !locality.is_empty() {
            lines.push(locality);
        }
        if let Some(country) = &self.country {
            lines.push(country.clone());
        }
        lines
    }
}

/// The customer attached to an admin order listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Keep the orders in `status`, preserving order.
#[must_use]
pub fn filter_orders_by_status(orders: &[Order], status: DeliveryStatus) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| order.delivery_status == status)
        .cloned()
        .collect()
}

// =============================================================================
// Requests
// =============================================================================

/// Checkout payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
}

/// One line of a [`NewOrder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_label: Option<String>,
}

/// Admin status change. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderStatusUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<DeliveryStatus>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rupees(amount: i64) -> Price {
        Price::from_amount(Decimal::from(amount))
    }

    fn item(name: &str, quantity: u32, unit: i64, subtotal: Option<i64>) -> OrderItem {
        OrderItem {
            id: None,
            product_id: None,
            product_name: Some(name.to_string()),
            product_image: None,
            variant_label: None,
            quantity,
            unit_price: rupees(unit),
            subtotal: subtotal.map(rupees),
        }
    }

    fn order(status: DeliveryStatus, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new("o1"),
            total_amount: rupees(1000),
            payment_status: PaymentStatus::Paid,
            delivery_status: status,
            payment_method: None,
            razorpay_order_id: None,
            created_at: None,
            items,
            shipping_address: None,
            customer: None,
        }
    }

    #[test]
    fn test_line_total_prefers_subtotal() {
        assert_eq!(item("A", 3, 100, None).line_total(), rupees(300));
        assert_eq!(item("A", 3, 100, Some(250)).line_total(), rupees(250));
    }

    #[test]
    fn test_item_count_and_total() {
        let o = order(
            DeliveryStatus::Shipped,
            vec![item("A", 2, 100, None), item("B", 1, 50, None)],
        );
        assert_eq!(o.item_count(), 3);
        assert_eq!(o.items_total(), rupees(250));
    }

    #[test]
    fn test_summary_truncates() {
        let o = order(
            DeliveryStatus::Pending,
            vec![
                item("A", 1, 1, None),
                item("B", 1, 1, None),
                item("C", 1, 1, None),
            ],
        );
        assert_eq!(o.summary(2), "A, B +1 more");
        assert_eq!(o.summary(5), "A, B, C");
    }

    #[test]
    fn test_filter_by_status() {
        let orders = vec![
            order(DeliveryStatus::Shipped, vec![]),
            order(DeliveryStatus::Delivered, vec![]),
            order(DeliveryStatus::Shipped, vec![]),
        ];
        assert_eq!(filter_orders_by_status(&orders, DeliveryStatus::Shipped).len(), 2);
        assert!(filter_orders_by_status(&orders, DeliveryStatus::Cancelled).is_empty());
    }

    #[test]
    fn test_address_lines() {
        let addr = ShippingAddress {
            name: Some("Asha Rao".to_string()),
            line1: Some("12 MG Road".to_string()),
            city: Some("Pune".to_string()),
            state: Some("MH".to_string()),
            pincode: Some("411001".to_string()),
            ..ShippingAddress::default()
        };
        assert_eq!(
            addr.lines(),
            vec!["Asha Rao", "12 MG Road", "Pune, MH 411001"]
        );
    }

    #[test]
    fn test_status_update_omits_unset() {
        let update = OrderStatusUpdate {
            delivery_status: Some(DeliveryStatus::OutForDelivery),
            ..OrderStatusUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"delivery_status": "out_for_delivery"})
        );
    }
}
