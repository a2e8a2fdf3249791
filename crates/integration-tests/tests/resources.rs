//! Resource methods: paths, query strings, bodies and response normalization.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;
use shopfront_client::{
    ApiError, ContactForm, NewOrder, NewOrderItem, OrderStatusUpdate, PaymentVerification,
    ProductQuery, SocialLinks,
};
use shopfront_core::{DeliveryStatus, PaymentStatus, ProductId};
use shopfront_integration_tests::{anonymous_client, signed_in_client};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_product_filters_become_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("search", "face wash"))
        .and(query_param("category", "Skin Care"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "p1",
                "name": "Neem Face Wash",
                "price": 249,
                "average_rating": "4.5",
                "review_count": 18,
                "image_path": "neem.png",
                "options": "[{\"label\":\"100 ml\",\"price\":249},{\"label\":\"200 ml\",\"price\":449,\"stock\":0}]"
            },
            "not a product",
            {"name": "No id"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let query = ProductQuery {
        search: Some("face wash".to_string()),
        category: Some("Skin Care".to_string()),
        sort: Some("  ".to_string()),
        featured: true,
    };
    let products = client.products(&query).await.unwrap();

    // Malformed elements are skipped, not fatal.
    assert_eq!(products.len(), 1);
    let product = products.first().unwrap();
    assert_eq!(product.reviews_count, 18);
    assert!((product.rating - 4.5).abs() < f64::EPSILON);
    assert_eq!(product.variants.len(), 2);
    assert!(!product.variant("200 ml").unwrap().is_selectable());
    assert_eq!(
        product.effective_price(Some("200 ml")).amount,
        Decimal::from(449)
    );
    assert_eq!(
        client.image_url(product.image.as_deref().unwrap()),
        format!("{}/uploads/neem.png", server.uri())
    );
}

#[tokio::test]
async fn test_track_order_encodes_email_and_normalizes_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/track"))
        .and(query_param("orderId", "1017"))
        .and(query_param("email", "asha+shop@example.in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1017,
            "total_amount": "648.00",
            "payment_status": "PAID",
            "delivery_status": "Out for delivery",
            "created_at": "2024-03-02 10:15:00",
            "OrderItems": [
                {"quantity": 2, "price": "199.50", "Product": {"name": "Aloe Gel"}},
                {"quantity": 1, "unit_price": 249, "subtotal": 249, "product_name": "Neem Face Wash"}
            ],
            "ShippingAddress": "{\"flat_house_no\":\"12\",\"area_street\":\"MG Road\",\"city\":\"Pune\",\"pincode\":411001}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = anonymous_client(&server)
        .track_order(&"1017".into(), "asha+shop@example.in")
        .await
        .unwrap();

    assert_eq!(order.delivery_status, DeliveryStatus::OutForDelivery);
    assert_eq!(order.delivery_status.tracking_step(), 3);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.created_at.is_some());
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.items_total().amount, Decimal::from(648));
    assert_eq!(order.summary(1), "Aloe Gel +1 more");

    let address = order.shipping_address.unwrap();
    assert_eq!(address.city.as_deref(), Some("Pune"));
    assert_eq!(address.pincode.as_deref(), Some("411001"));
}

#[tokio::test]
async fn test_create_order_sends_numeric_amounts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({
            "items": [{"product_id": "p1", "quantity": 2, "price": 199.5}],
            "total_amount": 399.0,
            "razorpay_order_id": "order_X"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 55, "total_amount": 399, "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    let order = client
        .create_order(&NewOrder {
            items: vec![NewOrderItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
                price: Decimal::new(1995, 1),
                variant_label: None,
            }],
            total_amount: Decimal::from(399),
            shipping_address: None,
            razorpay_order_id: Some("order_X".to_string()),
            razorpay_payment_id: None,
        })
        .await
        .unwrap();

    assert_eq!(order.id.as_str(), "55");
    assert_eq!(order.delivery_status, DeliveryStatus::Pending);
}

#[tokio::test]
async fn test_update_order_status_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/55/status"))
        .and(body_json(json!({"delivery_status": "shipped"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 55, "total_amount": 399, "status": "shipped", "payment_status": "paid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    let order = client
        .update_order_status(
            &"55".into(),
            &OrderStatusUpdate {
                delivery_status: Some(DeliveryStatus::Shipped),
                payment_status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(order.delivery_status, DeliveryStatus::Shipped);
}

#[tokio::test]
async fn test_wishlist_round() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "product_id": 9, "Product": {"id": 9, "name": "Aloe Gel", "price": 199}},
            {"id": 10, "name": "Rose Toner", "price": 299},
            {"note": "orphan"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/wishlist"))
        .and(body_json(json!({"product_id": "10"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "product_id": 10})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist/check/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"inWishlist": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Removed"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    let items = client.wishlist().await.unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(ids, vec!["9", "10"]);

    let rose = ProductId::new("10");
    let added = client.add_to_wishlist(&rose).await.unwrap();
    assert_eq!(added.product_id, rose);
    assert!(client.is_in_wishlist(&rose).await.unwrap());
    assert_eq!(client.remove_from_wishlist(&rose).await.unwrap().message, "Removed");
}

#[tokio::test]
async fn test_settings_and_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/social_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "social_links",
            "value": {"instagram": "https://instagram.com/shop"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings/social_links"))
        .and(body_json(json!({"value": {"youtube": "https://youtube.com/@shop"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "social_links",
            "value": {"youtube": "https://youtube.com/@shop"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/pages/privacy-policy"))
        .and(body_json(json!({"title": "Privacy", "content": "<p>We care.</p>"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "slug": "privacy-policy", "title": "Privacy",
            "content": "<p>We care.</p>", "updatedAt": "2024-05-01T09:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    let links = client.social_links().await.unwrap();
    assert_eq!(links.instagram.as_deref(), Some("https://instagram.com/shop"));
    assert!(links.facebook.is_none());

    let updated = client
        .update_social_links(&SocialLinks {
            youtube: Some("https://youtube.com/@shop".to_string()),
            ..SocialLinks::default()
        })
        .await
        .unwrap();
    assert!(updated.youtube.is_some());

    let page = client
        .update_page("privacy-policy", "Privacy", "<p>We care.</p>")
        .await
        .unwrap();
    assert_eq!(page.slug, "privacy-policy");
    assert!(page.updated_at.is_some());
}

#[tokio::test]
async fn test_payment_and_contact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create-order"))
        .and(body_json(json!({"amount": 648.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_ABC", "amount": 64850, "currency": "INR"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payment/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "message": "Payment verified"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .and(body_json(json!({"name": "Ravi", "email": "ravi@example.in", "message": "Hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Thanks!"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    let gateway = client
        .create_payment_order(Decimal::new(6485, 1))
        .await
        .unwrap();
    assert_eq!(gateway.amount, 64_850);

    let verified = client
        .verify_payment(&PaymentVerification {
            razorpay_order_id: gateway.id,
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_signature: "sig".to_string(),
        })
        .await
        .unwrap();
    assert!(verified.is_success());

    let reply = client
        .submit_contact(&ContactForm {
            name: "Ravi".to_string(),
            email: "ravi@example.in".to_string(),
            message: "Hello".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.message, "Thanks!");
}

#[tokio::test]
async fn test_catalog_lists_and_featured_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/from-products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Skin Care", "", 7, "Hair Care"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reviews/featured"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "rating": 5, "comment": "Great", "name": "Meera"},
            {"id": 2, "rating": "3.6", "comment": "Okay"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/banners/b%201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Banner deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));
    assert_eq!(
        client.categories_from_products().await.unwrap(),
        vec!["Skin Care".to_string(), "Hair Care".to_string()]
    );

    let reviews = client.featured_reviews(Some(2)).await.unwrap();
    let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![5, 3]);
    assert_eq!(reviews.last().unwrap().user_name, "Customer");

    let deleted = client.delete_banner(&"b 1".into()).await.unwrap();
    assert_eq!(deleted.message, "Banner deleted");
}

#[tokio::test]
async fn test_object_body_for_a_list_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "maintenance"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "T1", Some("R1"));

    let err = client.products(&ProductQuery::default()).await.unwrap_err();
    assert!(matches!(&err, ApiError::Decode(msg) if msg.contains("object")));
    assert_eq!(err.status(), None);

    let err = client.wishlist().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
