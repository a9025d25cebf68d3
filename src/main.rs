use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plan_checkout::adapters::gateway::{HttpGatewayConfig, HttpPaymentGateway};
use plan_checkout::adapters::http::{checkout_router, CheckoutAppState};
use plan_checkout::application::handlers::checkout::{
    CreatePaymentRequestHandler, HandlePaymentCallbackHandler,
};
use plan_checkout::config::AppConfig;
use plan_checkout::domain::billing::{CallbackValidator, PaymentRequestBuilder, PlanCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate()?;

    let payment = &config.payment;
    let builder = Arc::new(PaymentRequestBuilder::new(
        PlanCatalog::standard(),
        payment.merchant_profile(),
        payment.signature_engine(),
    ));
    let gateway = Arc::new(HttpPaymentGateway::new(
        HttpGatewayConfig::new(&payment.gateway_host).with_timeout(payment.gateway_timeout()),
    )?);

    let mut validator = CallbackValidator::new(payment.signature_engine());
    if let Some(secs) = payment.callback_max_age_secs {
        validator = validator.with_max_age_secs(secs);
    }

    let state = CheckoutAppState {
        checkout_handler: Arc::new(
            CreatePaymentRequestHandler::new(builder, gateway)
                .with_default_currency(payment.default_currency),
        ),
        callback_handler: Arc::new(HandlePaymentCallbackHandler::new(validator)),
    };

    let app = checkout_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        gateway_host = %payment.gateway_host,
        environment = ?config.server.environment,
        "Plan checkout listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
