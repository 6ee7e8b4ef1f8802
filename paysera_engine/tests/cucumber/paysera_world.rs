use cucumber::World;
use log::*;
use paysera_engine::{
    test_utils::{merchant_config, test_key_source},
    CallbackResult,
    ConfirmationResult,
    MemoryOrderStore,
    PaymentFlowApi,
    PaymentRequest,
    PayseraError,
    StaticKeySource,
};

#[derive(Default, Debug, World)]
pub struct PayseraWorld {
    pub system: Option<PaymentSystem>,
    pub last_callback: Option<Result<CallbackResult, PayseraError>>,
    pub last_checkout: Option<Result<PaymentRequest, PayseraError>>,
    pub last_confirmation: Option<ConfirmationResult>,
}

#[derive(Debug)]
pub struct PaymentSystem {
    pub api: PaymentFlowApi<MemoryOrderStore, StaticKeySource>,
}

impl PayseraWorld {
    pub fn api(&self) -> &PaymentFlowApi<MemoryOrderStore, StaticKeySource> {
        &self.system.as_ref().expect("PaymentFlowApi not initialised").api
    }

    pub fn store(&self) -> &MemoryOrderStore {
        self.api().store()
    }

    pub fn last_callback(&self) -> &Result<CallbackResult, PayseraError> {
        self.last_callback.as_ref().expect("No callback has been received")
    }
}

impl PaymentSystem {
    pub fn new() -> Self {
        let api = PaymentFlowApi::new(merchant_config(), MemoryOrderStore::default(), test_key_source());
        debug!("🚀️ Payment system created for project {}", api.config().project_id);
        Self { api }
    }
}
