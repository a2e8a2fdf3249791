//! Order and dashboard conversions.

use serde::Deserialize;
use serde_json::Value;
use shopfront_core::{DeliveryStatus, OrderId, OrderItemId, PaymentStatus, Price, ProductId};

use super::loose::{Amount, Count, Text, Timestamp};
use super::{ImageRefs, convert_items, nested, nested_list};
use crate::types::{
    DashboardStats, Order, OrderCustomer, OrderItem, SalesChart, SalesChartPoint, ShippingAddress,
    TopProduct,
};

// =============================================================================
// Orders
// =============================================================================

/// Order as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireOrder {
    id: OrderId,
    #[serde(default)]
    total_amount: Amount,
    #[serde(default)]
    payment_status: Text,
    #[serde(default)]
    delivery_status: Text,
    #[serde(default)]
    status: Text,
    #[serde(default)]
    payment_method: Text,
    #[serde(default)]
    razorpay_order_id: Text,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Timestamp,
    #[serde(default)]
    created_at: Timestamp,
    #[serde(default, rename = "OrderItems")]
    order_items: Option<Vec<Value>>,
    #[serde(default)]
    items: Option<Vec<Value>>,
    #[serde(default)]
    shipping_address: Option<Value>,
    #[serde(default, rename = "ShippingAddress")]
    shipping_address_pascal: Option<Value>,
    #[serde(default, rename = "shippingAddress")]
    shipping_address_camel: Option<Value>,
    #[serde(default, rename = "UserAddresses")]
    user_addresses: Option<Vec<Value>>,
    #[serde(default, rename = "User")]
    user: Option<WireOrderUser>,
    #[serde(default)]
    user_name: Text,
}

#[derive(Debug, Default, Deserialize)]
struct WireOrderUser {
    #[serde(default)]
    name: Text,
    #[serde(default)]
    email: Text,
    #[serde(default)]
    phone: Text,
}

#[derive(Debug, Deserialize)]
struct WireOrderItem {
    #[serde(default)]
    id: Option<OrderItemId>,
    #[serde(default)]
    product_id: Option<ProductId>,
    #[serde(default, rename = "Product")]
    product: Option<WireItemProduct>,
    #[serde(default)]
    product_name: Text,
    #[serde(default)]
    quantity: Count,
    #[serde(default)]
    unit_price: Amount,
    #[serde(default)]
    price: Amount,
    #[serde(default)]
    subtotal: Amount,
    #[serde(default)]
    variant_label: Text,
}

#[derive(Debug, Deserialize)]
struct WireItemProduct {
    #[serde(default)]
    id: Option<ProductId>,
    #[serde(default)]
    name: Text,
    #[serde(flatten)]
    image: ImageRefs,
}

#[derive(Debug, Default, Deserialize)]
struct WireShippingAddress {
    #[serde(default)]
    name: Text,
    #[serde(default)]
    first_name: Text,
    #[serde(default)]
    last_name: Text,
    #[serde(default)]
    email: Text,
    #[serde(default)]
    phone: Text,
    #[serde(default)]
    flat_house_no: Text,
    #[serde(default)]
    address_line1: Text,
    #[serde(default)]
    area_street: Text,
    #[serde(default)]
    address_line2: Text,
    #[serde(default)]
    landmark: Text,
    #[serde(default)]
    city: Text,
    #[serde(default)]
    state: Text,
    #[serde(default)]
    pincode: Text,
    #[serde(default)]
    country: Text,
}

pub fn convert_order(order: WireOrder) -> Order {
    let delivery_status = order
        .delivery_status
        .or(order.status)
        .0
        .map_or_else(DeliveryStatus::default, |s| DeliveryStatus::parse_lenient(&s));
    let payment_status = order
        .payment_status
        .0
        .map_or_else(PaymentStatus::default, |s| PaymentStatus::parse_lenient(&s));

    let items = order
        .order_items
        .or(order.items)
        .map(|items| convert_items(items, "order item", convert_order_item))
        .unwrap_or_default();

    let shipping_address = [
        order.shipping_address,
        order.shipping_address_pascal,
        order.shipping_address_camel,
        order
            .user_addresses
            .and_then(|addresses| addresses.into_iter().next()),
    ]
    .into_iter()
    .flatten()
    .find_map(nested::<WireShippingAddress>)
    .map(convert_shipping_address);

    let customer = convert_customer(
        order.user.unwrap_or_default(),
        order.user_name,
        shipping_address.as_ref(),
    );

    Order {
        id: order.id,
        total_amount: Price::from_amount(order.total_amount.or_zero()),
        payment_status,
        delivery_status,
        payment_method: order.payment_method.0,
        razorpay_order_id: order.razorpay_order_id.0,
        created_at: order.created_at_camel.or(order.created_at).0,
        items,
        shipping_address,
        customer,
    }
}

fn convert_order_item(item: WireOrderItem) -> OrderItem {
    let (product_id, product_name, product_image) = match item.product {
        Some(product) => (product.id, product.name.0, product.image.first()),
        None => (None, None, None),
    };

    let quantity = item
        .quantity
        .0
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(0);

    OrderItem {
        id: item.id,
        product_id: item.product_id.or(product_id),
        product_name: product_name.or(item.product_name.0),
        product_image,
        variant_label: item.variant_label.0,
        quantity,
        unit_price: Price::from_amount(
            item.unit_price.nonzero().unwrap_or_else(|| item.price.or_zero()),
        ),
        subtotal: item.subtotal.nonzero().map(Price::from_amount),
    }
}

fn convert_shipping_address(addr: WireShippingAddress) -> ShippingAddress {
    let full_name = match (addr.first_name.0, addr.last_name.0) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (first, last) => first.or(last),
    };

    ShippingAddress {
        name: addr.name.0.or(full_name),
        email: addr.email.0,
        phone: addr.phone.0,
        line1: addr.flat_house_no.or(addr.address_line1).0,
        line2: addr.area_street.or(addr.address_line2).0,
        landmark: addr.landmark.0,
        city: addr.city.0,
        state: addr.state.0,
        pincode: addr.pincode.0,
        country: addr.country.0,
    }
}

/// The account that placed the order, falling back to the contact details
/// on the shipping address.
fn convert_customer(
    user: WireOrderUser,
    user_name: Text,
    address: Option<&ShippingAddress>,
) -> Option<OrderCustomer> {
    let from_address = |field: fn(&ShippingAddress) -> &Option<String>| {
        address.and_then(|a| field(a).clone())
    };

    let customer = OrderCustomer {
        name: user.name.or(user_name).0.or_else(|| from_address(|a| &a.name)),
        email: user.email.0.or_else(|| from_address(|a| &a.email)),
        phone: user.phone.0.or_else(|| from_address(|a| &a.phone)),
    };

    if customer == OrderCustomer::default() {
        None
    } else {
        Some(customer)
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Dashboard statistics as the server sends them.
#[derive(Debug, Deserialize)]
pub struct WireDashboardStats {
    #[serde(default, alias = "totalOrders")]
    total_orders: Count,
    #[serde(default, alias = "totalProducts")]
    total_products: Count,
    #[serde(default, alias = "totalUsers")]
    total_users: Count,
    #[serde(default, alias = "totalSales")]
    total_sales: Amount,
    #[serde(default, alias = "recentOrders")]
    recent_orders: Option<Value>,
    #[serde(default, alias = "topProducts")]
    top_products: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireTopProduct {
    #[serde(default)]
    name: Text,
    #[serde(default)]
    price: Amount,
    #[serde(default, alias = "totalSold")]
    total_sold: Count,
}

/// Sales chart as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireSalesChart {
    #[serde(default)]
    daily: Option<Value>,
    #[serde(default)]
    monthly: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireChartPoint {
    #[serde(default)]
    label: Text,
    #[serde(default)]
    date: Text,
    #[serde(default)]
    month: Text,
    #[serde(default)]
    orders: Count,
    #[serde(default)]
    revenue: Amount,
}

fn count(value: Count) -> u64 {
    value.0.and_then(|n| u64::try_from(n).ok()).unwrap_or(0)
}

pub fn convert_dashboard_stats(stats: WireDashboardStats) -> DashboardStats {
    DashboardStats {
        total_orders: count(stats.total_orders),
        total_products: count(stats.total_products),
        total_users: count(stats.total_users),
        total_sales: Price::from_amount(stats.total_sales.or_zero()),
        recent_orders: stats
            .recent_orders
            .map(|v| nested_list(v, "recent order", convert_order))
            .unwrap_or_default(),
        top_products: stats
            .top_products
            .map(|v| {
                nested_list(v, "top product", |p: WireTopProduct| TopProduct {
                    name: p.name.0.unwrap_or_default(),
                    price: Price::from_amount(p.price.or_zero()),
                    total_sold: count(p.total_sold),
                })
            })
            .unwrap_or_default(),
    }
}

pub fn convert_sales_chart(chart: WireSalesChart) -> SalesChart {
    let series = |value: Option<Value>, what| {
        value
            .map(|v| nested_list(v, what, convert_chart_point))
            .unwrap_or_default()
    };
    SalesChart {
        daily: series(chart.daily, "daily sales point"),
        monthly: series(chart.monthly, "monthly sales point"),
    }
}

fn convert_chart_point(point: WireChartPoint) -> SalesChartPoint {
    SalesChartPoint {
        label: point
            .label
            .or(point.date)
            .or(point.month)
            .0
            .unwrap_or_default(),
        orders: count(point.orders),
        revenue: point.revenue.or_zero(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn convert(value: Value) -> Order {
        convert_order(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_canonical_order_shape() {
        let order = convert(json!({
            "id": 101,
            "total_amount": "598.00",
            "payment_status": "paid",
            "delivery_status": "out_for_delivery",
            "createdAt": "2024-05-01T09:30:00.000Z",
            "OrderItems": [{
                "id": 1,
                "product_id": 7,
                "quantity": 2,
                "price": 299,
                "Product": {"name": "Aloe Gel", "image_path": "aloe.png"}
            }],
            "shipping_address": {"first_name": "Asha", "last_name": "Rao", "flat_house_no": "12", "city": "Pune"},
            "User": {"name": "Asha Rao", "email": "asha@example.in"}
        }));

        assert_eq!(order.id.as_str(), "101");
        assert_eq!(order.total_amount.amount, Decimal::from(598));
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.delivery_status, DeliveryStatus::OutForDelivery);
        assert!(order.created_at.is_some());
        assert_eq!(order.item_count(), 2);

        let item = order.items.first().unwrap();
        assert_eq!(item.product_id.as_ref().unwrap().as_str(), "7");
        assert_eq!(item.product_name.as_deref(), Some("Aloe Gel"));
        assert_eq!(item.product_image.as_deref(), Some("aloe.png"));
        assert_eq!(item.line_total().amount, Decimal::from(598));

        let addr = order.shipping_address.unwrap();
        assert_eq!(addr.name.as_deref(), Some("Asha Rao"));
        assert_eq!(addr.line1.as_deref(), Some("12"));
        assert_eq!(order.customer.unwrap().email.as_deref(), Some("asha@example.in"));
    }

    #[test]
    fn test_legacy_order_shape() {
        let order = convert(json!({
            "id": "o-9",
            "total_amount": 150,
            "status": "Shipped",
            "created_at": "2024-05-01 09:30:00",
            "items": [{
                "product_name": "Neem Soap",
                "quantity": "3",
                "unit_price": "50",
                "subtotal": 140
            }],
            "UserAddresses": [{
                "name": "Ravi",
                "phone": "9999999999",
                "address_line1": "Flat 4",
                "address_line2": "Park Street"
            }],
            "user_name": "Ravi K"
        }));

        assert_eq!(order.delivery_status, DeliveryStatus::Shipped);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.created_at.is_some());

        let item = order.items.first().unwrap();
        assert_eq!(item.product_name.as_deref(), Some("Neem Soap"));
        assert_eq!(item.unit_price.amount, Decimal::from(50));
        assert_eq!(item.line_total().amount, Decimal::from(140));

        let addr = order.shipping_address.as_ref().unwrap();
        assert_eq!(addr.line1.as_deref(), Some("Flat 4"));
        assert_eq!(addr.line2.as_deref(), Some("Park Street"));

        let customer = order.customer.unwrap();
        assert_eq!(customer.name.as_deref(), Some("Ravi K"));
        assert_eq!(customer.phone.as_deref(), Some("9999999999"));
    }

    #[test]
    fn test_address_as_json_text_and_precedence() {
        let order = convert(json!({
            "id": 1,
            "shipping_address": "{\"city\": \"Mumbai\"}",
            "shippingAddress": {"city": "Delhi"}
        }));
        assert_eq!(
            order.shipping_address.unwrap().city.as_deref(),
            Some("Mumbai")
        );
    }

    #[test]
    fn test_minimal_order() {
        let order = convert(json!({"id": 5, "delivery_status": "teleported"}));
        assert_eq!(order.delivery_status, DeliveryStatus::Pending);
        assert!(order.items.is_empty());
        assert!(order.shipping_address.is_none());
        assert!(order.customer.is_none());
        assert_eq!(order.total_amount.amount, Decimal::ZERO);
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = convert_dashboard_stats(
            serde_json::from_value(json!({
                "totalOrders": 12,
                "totalProducts": "30",
                "totalUsers": 4,
                "totalSales": "15499.50",
                "recentOrders": [{"id": 1, "status": "delivered"}, {"no_id": true}],
                "topProducts": [{"name": "Aloe Gel", "price": 240, "total_sold": 9}]
            }))
            .unwrap(),
        );
        assert_eq!(stats.total_orders, 12);
        assert_eq!(stats.total_products, 30);
        assert_eq!(stats.total_sales.amount, Decimal::new(1_549_950, 2));
        assert_eq!(stats.recent_orders.len(), 1);
        assert_eq!(stats.top_products.first().unwrap().total_sold, 9);
    }

    #[test]
    fn test_sales_chart_labels() {
        let chart = convert_sales_chart(
            serde_json::from_value(json!({
                "daily": [{"date": "2024-05-01", "orders": 3, "revenue": 900}],
                "monthly": [{"label": "May", "month": "2024-05", "orders": 40, "revenue": "12000"}]
            }))
            .unwrap(),
        );
        assert_eq!(chart.daily.first().unwrap().label, "2024-05-01");
        assert_eq!(chart.monthly.first().unwrap().label, "May");
        assert_eq!(chart.total_revenue(true), Decimal::from(12000));
    }
}
