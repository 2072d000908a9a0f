use std::path::Path;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod gateways;
mod messaging;
mod metrics;
mod store;

#[cfg(test)]
mod testing;

use config::AppConfig;
use domain::order::{OrderService, OrderUseCase};
use domain::product::ProductService;
use gateways::{HttpAuthorizer, HttpPaymentClient, ReqwestTransport};
use messaging::{BrokerOrderNotifier, OrderEventConsumer, RedpandaClient, RedpandaSubscription};
use store::{PgOrderRepository, PgProductRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_service=debug")),
        )
        .init();

    tracing::info!("🚀 Starting order service");

    // === 1. Configuration ===
    let config = AppConfig::from_env()?;

    // === 2. PostgreSQL pool and schema ===
    tracing::info!(max_connections = config.database_max_connections, "Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    Migrator::new(Path::new(&config.migrations_path))
        .await?
        .run(&pool)
        .await?;
    tracing::info!(path = %config.migrations_path, "✅ Migrations applied");

    // === 3. Initialize Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 4. Outbound HTTP gateways ===
    let transport = Arc::new(ReqwestTransport::new(config.default_timeout)?);
    let authorizer = Arc::new(HttpAuthorizer::new(transport.clone(), config.authorizer_url.clone()));
    let payment = Arc::new(HttpPaymentClient::new(transport, config.payment_url.clone()));

    // === 5. Repositories and services ===
    let product_service = Arc::new(ProductService::new(Arc::new(PgProductRepository::new(pool.clone()))));
    let order_repository = Arc::new(PgOrderRepository::new(pool));

    // === 6. Redpanda producer ===
    let redpanda = Arc::new(RedpandaClient::new(&config.kafka.brokers)?);
    let notifier = Arc::new(BrokerOrderNotifier::new(redpanda, config.kafka.production_topic.clone()));

    let order_use_case: Arc<dyn OrderUseCase> = Arc::new(OrderService::new(
        order_repository,
        product_service.clone(),
        authorizer,
        payment,
        notifier,
        metrics.clone(),
    ));

    // === 7. Order event consumers ===
    let paid = Arc::new(RedpandaSubscription::new(
        &config.kafka.brokers,
        &config.kafka.consumer_group,
        &config.kafka.paid_topic,
    )?);
    let ready = Arc::new(RedpandaSubscription::new(
        &config.kafka.brokers,
        &config.kafka.consumer_group,
        &config.kafka.ready_topic,
    )?);
    let consumers = OrderEventConsumer::new(order_use_case.clone(), paid, ready, metrics.clone())
        .start_consumers();

    // === 8. HTTP API, metrics and health ===
    tracing::info!(port = config.port, "🌐 Serving HTTP on http://0.0.0.0:{}", config.port);
    let server = HttpServer::new(move || {
        App::new()
            .configure(api::configure(order_use_case.clone(), product_service.clone()))
            .configure(metrics::configure(metrics.clone()))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await;

    for consumer in consumers {
        consumer.abort();
    }
    tracing::info!("👋 Order service stopped");

    server?;
    Ok(())
}
