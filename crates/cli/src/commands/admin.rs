//! Admin commands: dashboard figures and order management.
//!
//! The server enforces the admin role; these commands only check that a
//! session exists.

use std::io::Write;

use shopfront_client::{ApiClient, OrderStatusUpdate, SalesChart, filter_orders_by_status};
use shopfront_core::{DeliveryStatus, OrderId, PaymentStatus};

use super::shop::order_line;
use super::{CliError, require_session};

/// Print dashboard totals, recent orders and best sellers.
///
/// # Errors
///
/// Returns `CliError::Api` if the request fails or the user is not an admin.
pub async fn stats(client: &ApiClient, out: &mut impl Write) -> Result<(), CliError> {
    require_session(client)?;
    let stats = client.dashboard_stats().await?;

    writeln!(out, "Orders:   {}", stats.total_orders)?;
    writeln!(out, "Products: {}", stats.total_products)?;
    writeln!(out, "Users:    {}", stats.total_users)?;
    writeln!(out, "Sales:    {}", stats.total_sales)?;

    if !stats.top_products.is_empty() {
        writeln!(out, "\nTop products")?;
        for product in &stats.top_products {
            writeln!(out, "  {}\t{}\t{} sold", product.name, product.price, product.total_sold)?;
        }
    }
    if !stats.recent_orders.is_empty() {
        writeln!(out, "\nRecent orders")?;
        for order in &stats.recent_orders {
            writeln!(out, "  {}", order_line(order))?;
        }
    }
    Ok(())
}

/// Print the daily or monthly sales series.
///
/// # Errors
///
/// Returns `CliError::Api` if the request fails.
pub async fn chart(client: &ApiClient, monthly: bool, out: &mut impl Write) -> Result<(), CliError> {
    require_session(client)?;
    let chart = client.sales_chart().await?;
    write_chart(&chart, monthly, out)
}

fn write_chart(chart: &SalesChart, monthly: bool, out: &mut impl Write) -> Result<(), CliError> {
    let series = chart.series(monthly);
    if series.is_empty() {
        writeln!(out, "No sales recorded")?;
        return Ok(());
    }
    for point in series {
        writeln!(out, "{}\t{} orders\t₹{:.2}", point.label, point.orders, point.revenue)?;
    }
    writeln!(out, "Total\t\t₹{:.2}", chart.total_revenue(monthly))?;
    Ok(())
}

/// List every order, optionally only those with one delivery status.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown status, or
/// `CliError::Api` if the request fails.
pub async fn orders(
    client: &ApiClient,
    status: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let status = status.map(parse_delivery_status).transpose()?;
    require_session(client)?;

    let mut orders = client.all_orders().await?;
    if let Some(status) = status {
        orders = filter_orders_by_status(&orders, status);
    }
    for order in &orders {
        writeln!(out, "{}", order_line(order))?;
    }
    writeln!(out, "{} order(s)", orders.len())?;
    Ok(())
}

/// Change an order's delivery status, and optionally its payment status.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown status, or
/// `CliError::Api` if the update is rejected.
pub async fn set_status(
    client: &ApiClient,
    id: &OrderId,
    delivery: &str,
    payment: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let update = OrderStatusUpdate {
        delivery_status: Some(parse_delivery_status(delivery)?),
        payment_status: payment
            .map(|p| {
                p.parse::<PaymentStatus>()
                    .map_err(|e| CliError::InvalidArgument(e.to_string()))
            })
            .transpose()?,
    };
    require_session(client)?;

    let order = client.update_order_status(id, &update).await?;
    writeln!(
        out,
        "Order #{} is now {} ({})",
        order.id,
        order.delivery_status.label(),
        order.payment_status
    )?;
    Ok(())
}

fn parse_delivery_status(raw: &str) -> Result<DeliveryStatus, CliError> {
    raw.parse::<DeliveryStatus>()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))
}
