use std::{path::Path, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use paysera_engine::{db_types::OrderSnapshot, MemoryOrderStore, PaymentFlowApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    key_source::CertificateKeySource,
    routes::{cancel, health, CallbackRoute, CheckoutRoute, ConfirmRoute, RedirectTargets},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if let Err(e) = config.merchant.ensure_configured() {
        warn!("🪛️ {e}. Checkouts and callbacks will be refused until this is fixed.");
    }
    let store = MemoryOrderStore::default();
    if let Some(path) = &config.orders_file {
        let count = load_orders(&store, path).await?;
        info!("🗃️ Loaded {count} orders from {}", path.display());
    }
    let keys = CertificateKeySource::new(&config.public_key)?;
    let srv = create_server_instance(config, store, keys)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    store: MemoryOrderStore,
    keys: CertificateKeySource,
) -> Result<Server, ServerError> {
    let targets =
        RedirectTargets { account_url: config.account_url.clone(), products_url: config.products_url.clone() };
    let merchant = config.merchant.clone();
    let srv = HttpServer::new(move || {
        let api = PaymentFlowApi::new(merchant.clone(), store.clone(), keys.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("paysera::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(targets.clone()))
            .service(health)
            .service(CheckoutRoute::<MemoryOrderStore, CertificateKeySource>::new())
            .service(CallbackRoute::<MemoryOrderStore, CertificateKeySource>::new())
            .service(ConfirmRoute::<MemoryOrderStore, CertificateKeySource>::new())
            .service(cancel)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Reads a JSON array of orders and adds them to the store. Orders that are already present are left alone.
pub async fn load_orders(store: &MemoryOrderStore, path: &Path) -> Result<usize, ServerError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let orders = serde_json::from_str::<Vec<OrderSnapshot>>(&contents)
        .map_err(|e| ServerError::InitializeError(format!("Could not read orders from {}. {e}", path.display())))?;
    let mut count = 0;
    for order in orders {
        let number = order.number.clone();
        if store.insert(order).await {
            count += 1;
        } else {
            warn!("🗃️ Order {number} appears more than once in {}. Keeping the first one.", path.display());
        }
    }
    Ok(count)
}
