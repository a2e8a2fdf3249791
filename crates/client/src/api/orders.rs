//! Checkout, order history, tracking and payment.

use rust_decimal::Decimal;
use shopfront_core::OrderId;
use tracing::instrument;

use super::{segment, with_query};
use crate::client::ApiClient;
use crate::conversions::{WireOrder, convert_order};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{
    NewOrder, Order, OrderStatusUpdate, PaymentOrder, PaymentOrderRequest, PaymentVerification,
    PaymentVerificationResult,
};

impl ApiClient {
    /// Place an order for the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total_amount))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let request = ApiRequest::post("/api/orders").json(order)?;
        let order = self.fetch_one::<WireOrder, _>(request, convert_order).await?;
        tracing::info!(order_id = %order.id, "Order placed");
        Ok(order)
    }

    /// Orders of the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/orders"), "order", convert_order)
            .await
    }

    /// One order with its items and shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{}", segment(id.as_str()));
        self.fetch_one::<WireOrder, _>(ApiRequest::get(path), convert_order)
            .await
    }

    /// Look up an order by ID and the email it was placed with. Works
    /// without signing in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if no order matches both.
    #[instrument(skip(self, email), fields(order_id = %order_id))]
    pub async fn track_order(&self, order_id: &OrderId, email: &str) -> Result<Order, ApiError> {
        let path = with_query(
            "/api/orders/track",
            [("orderId", order_id.as_str()), ("email", email.trim())],
        );
        self.fetch_one::<WireOrder, _>(ApiRequest::get(path), convert_order)
            .await
    }

    /// Every order (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/orders/all"), "order", convert_order)
            .await
    }

    /// Change an order's payment or delivery status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        update: &OrderStatusUpdate,
    ) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{}/status", segment(id.as_str()));
        let request = ApiRequest::put(path).json(update)?;
        self.fetch_one::<WireOrder, _>(request, convert_order).await
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Open a gateway order for `amount` rupees before checkout.
    ///
    /// The returned amount is in paise, as the gateway reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn create_payment_order(&self, amount: Decimal) -> Result<PaymentOrder, ApiError> {
        self.post("/api/payment/create-order", &PaymentOrderRequest { amount })
            .await
    }

    /// Check the gateway signature of a completed payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. A signature mismatch is
    /// usually a 400 `ApiError::Status`.
    #[instrument(skip(self, verification), fields(razorpay_order_id = %verification.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<PaymentVerificationResult, ApiError> {
        self.post("/api/payment/verify", verification).await
    }
}
