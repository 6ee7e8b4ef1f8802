use actix_web::{body::MessageBody, http::header, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;
use paysera_engine::{codec::encode_query, InboundNotification};

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub async fn get_request<F>(path: &str, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(String::from);
    let bytes = res.into_body().try_into_bytes().unwrap_or_default();
    let body = String::from_utf8_lossy(&bytes).into_owned();
    TestResponse { status, location, body }
}

/// The query string Paysera appends to callback and return URLs.
pub fn notification_query(notification: &InboundNotification) -> String {
    encode_query([
        ("data", notification.data.as_str()),
        ("ss1", notification.ss1.as_str()),
        ("ss2", notification.ss2.as_str()),
    ])
}
