//! Canonical types returned by the resource methods.
//!
//! Every type here has exactly one shape. The many spellings the server
//! uses on the wire are folded into these in `conversions`.

mod catalog;
mod content;
mod dashboard;
mod order;
mod product;
mod review;
mod user;

pub use catalog::{Banner, BannerInput, Category, CategoryInput, Concern, ConcernInput};
pub(crate) use content::{PageUpdate, PaymentOrderRequest};
pub use content::{
    ApiMessage, ContactForm, ContactMessage, PageContent, PaymentOrder, PaymentVerification,
    PaymentVerificationResult, Setting, SocialLinks, WishlistItem,
};
pub use dashboard::{DashboardStats, SalesChart, SalesChartPoint, TopProduct};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderCustomer, OrderItem, OrderStatusUpdate, ShippingAddress,
    filter_orders_by_status,
};
pub use product::{
    Product, ProductInput, ProductQuery, ProductVariant, UploadedFile, VariantInput,
};
pub use review::{NewReview, Review, ReviewSummary, ReviewedProduct};
pub use user::{Address, AddressInput, AdminUser, ProfileUpdate, UserProfile};
