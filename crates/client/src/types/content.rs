//! Wishlist, contact, payment, settings and static page types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{ContactMessageId, PageId, ProductId, WishlistItemId};

use super::product::Product;

/// Body of message-only responses such as deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Wishlist
// =============================================================================

/// An entry in the customer's wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: Option<WishlistItemId>,
    pub product_id: ProductId,
    /// The product, when the listing embeds it.
    pub product: Option<Product>,
}

// =============================================================================
// Contact
// =============================================================================

/// A message from the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A contact message as seen by admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment gateway order, created before checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in minor units (paise), as the gateway reports it.
    pub amount: i64,
    pub currency: String,
}

/// Gateway callback values to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Outcome of a payment verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerificationResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl PaymentVerificationResult {
    /// Whether the gateway signature checked out.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "success" | "ok" | "verified" | "paid"
        )
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentOrderRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

// =============================================================================
// Settings and pages
// =============================================================================

/// Social profile links shown in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// A key/value site setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting<T> {
    pub key: String,
    pub value: T,
}

/// An editable static page such as "about" or "privacy-policy".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub id: Option<PageId>,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PageUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}
