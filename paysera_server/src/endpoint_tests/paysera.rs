use actix_web::{http::StatusCode, web, web::ServiceConfig};
use paysera_engine::{
    test_utils::{init_test_logging, merchant_config, payment_notification, sample_order, test_public_key},
    traits::KeySourceError,
    MemoryOrderStore,
    PaymentFlowApi,
};

use super::{
    helpers::{get_request, notification_query},
    mocks::MockKeySource,
};
use crate::routes::{cancel, health, CallbackRoute, CheckoutRoute, ConfirmRoute, RedirectTargets};

fn configure(store: MemoryOrderStore, keys: MockKeySource) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = PaymentFlowApi::new(merchant_config(), store, keys);
        let targets = RedirectTargets { account_url: "/account".into(), products_url: "/products".into() };
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(targets))
            .service(health)
            .service(CheckoutRoute::<MemoryOrderStore, MockKeySource>::new())
            .service(CallbackRoute::<MemoryOrderStore, MockKeySource>::new())
            .service(ConfirmRoute::<MemoryOrderStore, MockKeySource>::new())
            .service(cancel);
    }
}

fn working_keys() -> MockKeySource {
    let mut keys = MockKeySource::new();
    keys.expect_public_key().returning(|| Ok(test_public_key()));
    keys
}

/// A key source that must not be consulted at all.
fn untouched_keys() -> MockKeySource {
    let mut keys = MockKeySource::new();
    keys.expect_public_key().times(0);
    keys
}

async fn store_with(number: &str, total: i64) -> MemoryOrderStore {
    let store = MemoryOrderStore::default();
    store.insert(sample_order(number, total)).await;
    store
}

async fn callback(store: &MemoryOrderStore, order_id: &str, payamount: i64) -> (StatusCode, String) {
    let notification = payment_notification("12", order_id, payamount);
    let path = format!("/paysera/callback?{}", notification_query(&notification));
    let res = get_request(&path, configure(store.clone(), working_keys())).await;
    (res.status, res.body)
}

#[actix_web::test]
async fn health_check() {
    init_test_logging();
    let res = get_request("/health", configure(MemoryOrderStore::default(), untouched_keys())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "👍️\n");
}

#[actix_web::test]
async fn checkout_redirects_to_payment_page() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let res = get_request("/paysera/checkout/R4131", configure(store, untouched_keys())).await;
    assert_eq!(res.status, StatusCode::FOUND);
    let location = res.location.expect("No redirect location");
    assert!(location.starts_with("https://www.paysera.lt/pay/?data="));
    assert!(location.contains("&sign="));
}

#[actix_web::test]
async fn checkout_unknown_order() {
    init_test_logging();
    let res = get_request("/paysera/checkout/R999", configure(MemoryOrderStore::default(), untouched_keys())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "Error: Couldn't find order R999");
    assert!(res.location.is_none());
}

#[actix_web::test]
async fn checkout_refuses_paid_orders() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let (_, body) = callback(&store, "R4131", 9400).await;
    assert_eq!(body, "OK");
    let res = get_request("/paysera/checkout/R4131", configure(store, untouched_keys())).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.location.is_none());
}

#[actix_web::test]
async fn callback_settles_order() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let (status, body) = callback(&store, "R4131", 9400).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    let payments = store.payments_for("R4131").await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount.value(), 9400);
    assert!(payments[0].is_completed());
}

#[actix_web::test]
async fn repeated_callback_is_acknowledged_once() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    assert_eq!(callback(&store, "R4131", 9400).await.1, "OK");
    assert_eq!(callback(&store, "R4131", 9400).await.1, "OK");
    assert_eq!(store.payments_for("R4131").await.len(), 1);
}

#[actix_web::test]
async fn overpayment_reports_credit() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let (status, body) = callback(&store, "R4131", 9500).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK credit owed: 1.00");
}

#[actix_web::test]
async fn underpayment_is_an_error() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let (status, body) = callback(&store, "R4131", 9300).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Error: bad order amount");
    assert!(store.payments_for("R4131").await.is_empty());
}

#[actix_web::test]
async fn forged_ss1_skips_key_fetch() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let mut notification = payment_notification("12", "R4131", 9400);
    notification.ss1 = "0".repeat(32);
    let path = format!("/paysera/callback?{}", notification_query(&notification));
    let res = get_request(&path, configure(store.clone(), untouched_keys())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "Error: invalid ss1");
    assert!(store.payments_for("R4131").await.is_empty());
}

#[actix_web::test]
async fn missing_data_parameter() {
    init_test_logging();
    let path = "/paysera/callback?ss1=abc&ss2=def";
    let res = get_request(path, configure(MemoryOrderStore::default(), untouched_keys())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "Error: data not found");
}

#[actix_web::test]
async fn unavailable_key_fails_closed() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let mut keys = MockKeySource::new();
    keys.expect_public_key().times(1).returning(|| Err(KeySourceError::FetchError("timed out".into())));
    let notification = payment_notification("12", "R4131", 9400);
    let path = format!("/paysera/callback?{}", notification_query(&notification));
    let res = get_request(&path, configure(store.clone(), keys)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "Error: invalid ss2");
    assert!(store.payments_for("R4131").await.is_empty());
}

#[actix_web::test]
async fn wrong_project_is_rejected() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let notification = payment_notification("13", "R4131", 9400);
    let path = format!("/paysera/callback?{}", notification_query(&notification));
    let res = get_request(&path, configure(store.clone(), working_keys())).await;
    assert_eq!(res.body, "Error: wrong project id");
    assert!(store.payments_for("R4131").await.is_empty());
}

#[actix_web::test]
async fn confirm_paid_order() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    callback(&store, "R4131", 9400).await;
    let notification = payment_notification("12", "R4131", 9400);
    let path = format!("/paysera/confirm?{}", notification_query(&notification));
    let res = get_request(&path, configure(store, working_keys())).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/account?notice=Your+order+has+been+processed+successfully"));
}

#[actix_web::test]
async fn confirm_before_callback() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    let notification = payment_notification("12", "R4131", 9400);
    let path = format!("/paysera/confirm?{}", notification_query(&notification));
    let res = get_request(&path, configure(store.clone(), working_keys())).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/account?alert=Payment+could+not+be+processed"));
    assert!(store.payments_for("R4131").await.is_empty());
}

#[actix_web::test]
async fn confirm_with_bad_signature() {
    init_test_logging();
    let store = store_with("R4131", 9400).await;
    callback(&store, "R4131", 9400).await;
    let mut notification = payment_notification("12", "R4131", 9400);
    notification.ss1 = "f".repeat(32);
    let path = format!("/paysera/confirm?{}", notification_query(&notification));
    let res = get_request(&path, configure(store, untouched_keys())).await;
    assert_eq!(res.location.as_deref(), Some("/account?alert=Payment+could+not+be+processed"));
}

#[actix_web::test]
async fn cancel_returns_to_products() {
    init_test_logging();
    let res = get_request("/paysera/cancel", configure(MemoryOrderStore::default(), untouched_keys())).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/products?notice=Your+order+has+been+canceled"));
}
