//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Paysera talks to these endpoints in two ways. The callback is a server-to-server request, and it must always be
//! answered with a 200 and a plain-text body: `OK…` on success and `Error: …` otherwise. The confirm and cancel
//! endpoints are hit by the buyer's browser on the way back from the payment page, and only ever redirect.
use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use log::*;
use paysera_engine::{
    codec::encode_query,
    traits::{OrderStore, PublicKeySource},
    ConfirmationResult,
    InboundNotification,
    NotificationParams,
    PaymentFlowApi,
    PayseraError,
};

use crate::errors::ServerError;

pub const ORDER_PROCESSED_NOTICE: &str = "Your order has been processed successfully";
pub const PAYMENT_FAILED_ALERT: &str = "Payment could not be processed";
pub const ORDER_CANCELED_NOTICE: &str = "Your order has been canceled";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Configuration shared by the browser-facing redirects.
#[derive(Debug, Clone)]
pub struct RedirectTargets {
    pub account_url: String,
    pub products_url: String,
}

/// Redirects with a flash message in the query string, e.g. `/account?notice=Your+order+has+been+canceled`.
fn redirect_with(base: &str, kind: &str, message: &str) -> HttpResponse {
    let separator = if base.contains('?') { '&' } else { '?' };
    let flash = encode_query([(kind, message)]);
    HttpResponse::Found().insert_header((header::LOCATION, format!("{base}{separator}{flash}"))).finish()
}

/// Reads `data`, `ss1` and `ss2` from the query string. A query that cannot be read is reported like any other bad
/// notification, so that the callback can still answer with a 200.
fn notification_from(req: &HttpRequest) -> Result<InboundNotification, PayseraError> {
    let params = web::Query::<NotificationParams>::from_query(req.query_string())
        .map_err(|e| PayseraError::ParseError(format!("Invalid query string. {e}")))?;
    InboundNotification::try_from(params.into_inner())
}

fn plain_text(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(body)
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Get "/paysera/checkout/{order_number}" impl OrderStore, PublicKeySource);
/// Sends the buyer to Paysera's payment page for the order.
///
/// If the request cannot be built (unknown order, invalid fields, missing configuration) nothing is redirected and the
/// error is rendered instead.
pub async fn checkout<S, K>(
    path: web::Path<String>,
    api: web::Data<PaymentFlowApi<S, K>>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
    K: PublicKeySource,
{
    let order_number = path.into_inner();
    trace!("💻️ Checkout request for order {order_number}");
    let request = api.checkout(&order_number).await.map_err(|e| {
        warn!("💻️ Could not build a payment request for order {order_number}. {e}");
        e
    })?;
    debug!("💻️ Redirecting buyer to Paysera for order {order_number}");
    Ok(HttpResponse::Found().insert_header((header::LOCATION, request.redirect_url)).finish())
}

//----------------------------------------------   Callback  ----------------------------------------------------
route!(callback => Get "/paysera/callback" impl OrderStore, PublicKeySource);
/// Paysera's server-to-server payment notification. Always a 200 with a plain-text body.
pub async fn callback<S, K>(
    req: HttpRequest,
    api: web::Data<PaymentFlowApi<S, K>>,
) -> HttpResponse
where
    S: OrderStore,
    K: PublicKeySource,
{
    trace!("💻️ Received Paysera callback");
    let result = match notification_from(&req) {
        Ok(notification) => api.process_callback(&notification).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(result) => {
            info!("💻️ Callback for order {} processed: {}", result.order_number, result.outcome);
            plain_text(result.acknowledgement())
        },
        Err(e) => {
            warn!("💻️ Callback rejected. {e}");
            plain_text(format!("Error: {e}"))
        },
    }
}

//----------------------------------------------   Confirm  ----------------------------------------------------
route!(confirm => Get "/paysera/confirm" impl OrderStore, PublicKeySource);
/// The buyer's return from the payment page. Redirects to the account page with a notice or an alert.
pub async fn confirm<S, K>(
    req: HttpRequest,
    api: web::Data<PaymentFlowApi<S, K>>,
    targets: web::Data<RedirectTargets>,
) -> HttpResponse
where
    S: OrderStore,
    K: PublicKeySource,
{
    trace!("💻️ Buyer returned from Paysera");
    let result = match notification_from(&req) {
        Ok(notification) => api.confirm(&notification).await,
        Err(e) => ConfirmationResult::NotProcessed(e.to_string()),
    };
    match result {
        ConfirmationResult::Processed(order) => {
            debug!("💻️ Order {} confirmed as {}", order.number, order.payment_state);
            redirect_with(&targets.account_url, "notice", ORDER_PROCESSED_NOTICE)
        },
        ConfirmationResult::NotProcessed(reason) => {
            debug!("💻️ Payment not confirmed: {reason}");
            redirect_with(&targets.account_url, "alert", PAYMENT_FAILED_ALERT)
        },
    }
}

//----------------------------------------------   Cancel  ----------------------------------------------------
#[get("/paysera/cancel")]
pub async fn cancel(targets: web::Data<RedirectTargets>) -> impl Responder {
    trace!("💻️ Buyer canceled payment");
    redirect_with(&targets.products_url, "notice", ORDER_CANCELED_NOTICE)
}
