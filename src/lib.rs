pub mod app;
pub mod config;
pub mod domain {
    pub mod payment;
    pub mod summary;
}
pub mod health;
pub mod http;
pub mod processors;
pub mod queue;
pub mod repo;
pub mod service {
    pub mod payment_service;
}
pub mod worker;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub processors: worker::dispatcher::ProcessorSet,
}
