//! In-memory collaborators shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::error::KafkaError;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::order::{
    Order, OrderCreated, OrderError, OrderStatus, OrderSubmission, OrderUseCase, ProductionOrder,
};
use crate::domain::pagination::{Page, PageParams};
use crate::domain::product::{Product, ProductDraft};
use crate::gateways::authorizer::{AuthorizedUser, AuthorizerResponse};
use crate::gateways::http_client::{HttpResponse, HttpTransport};
use crate::gateways::payment::PaymentQrCode;
use crate::gateways::{Authorizer, GatewayError, PaymentGateway, PaymentRequest};
use crate::messaging::error::BrokerError;
use crate::messaging::redpanda::Publisher;
use crate::messaging::subscription::{MessageHandler, Subscription};
use crate::messaging::{NotifyError, OrderNotifier};
use crate::metrics::Metrics;
use crate::store::{OrderRepository, ProductRepository, StoreError};

// ============================================================================
// Builders
// ============================================================================

pub fn product(id: i64, name: &str, category: &str, price: Decimal) -> Product {
    Product {
        id,
        name: name.to_string(),
        sku_id: format!("SKU-{id}"),
        description: format!("{name} description"),
        category: category.to_string(),
        price,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn order(id: i64) -> Order {
    Order {
        id,
        items: Vec::new(),
        coupon: None,
        total_amount: Decimal::ZERO,
        status: OrderStatus::Created,
        created_at: Utc::now(),
        customer_cpf: "52998224725".to_string(),
    }
}

/// Sum of every sample of a counter family, zero when it was never touched.
pub fn counter(metrics: &Metrics, name: &str) -> f64 {
    metrics
        .registry()
        .gather()
        .iter()
        .find(|family| family.name() == name)
        .map(|family| {
            family
                .metric
                .iter()
                .map(|m| m.counter.value.unwrap_or_default())
                .sum()
        })
        .unwrap_or_default()
}

/// Pool for the `#[ignore]`d repository tests, migrated before use.
pub async fn pg_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate::Migrator::new(std::path::Path::new("./migrations"))
        .await
        .unwrap()
        .run(&pool)
        .await
        .unwrap();
    pool
}

fn unavailable(operation: &'static str) -> StoreError {
    StoreError::Query {
        operation,
        source: sqlx::Error::PoolTimedOut,
    }
}

fn page_of<T: Clone>(items: &[T], page: &PageParams) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

// ============================================================================
// Stores
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<BTreeMap<i64, Product>>,
}

impl InMemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all_products(
        &self,
        page: &PageParams,
        category: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        Ok(page_of(&products, page))
    }

    async fn find_product_by_id(&self, id: i64) -> Result<Product, StoreError> {
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn save_product(&self, draft: &ProductDraft, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let mut products = self.products.lock().unwrap();
        let id = products.keys().next_back().map_or(1, |last| last + 1);
        products.insert(
            id,
            Product {
                id,
                name: draft.name.clone(),
                sku_id: draft.sku_id.clone(),
                description: draft.description.clone(),
                category: draft.category.clone(),
                price: draft.price,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_product(&self, id: i64, draft: &ProductDraft, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut products = self.products.lock().unwrap();
        let product = products.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.name = draft.name.clone();
        product.sku_id = draft.sku_id.clone();
        product.description = draft.description.clone();
        product.category = draft.category.clone();
        product.price = draft.price;
        product.updated_at = now;
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<(), StoreError> {
        self.products
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<BTreeMap<i64, Order>>,
    status_updates: Mutex<Vec<(i64, OrderStatus)>>,
    unavailable: bool,
    lookups_unavailable: bool,
}

impl InMemoryOrderRepository {
    /// Every call fails as if the database were unreachable.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Writes succeed but `find_order_by_id` fails.
    pub fn failing_lookups() -> Self {
        Self {
            lookups_unavailable: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id, order);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().values().cloned().collect()
    }

    pub fn status_updates(&self) -> Vec<(i64, OrderStatus)> {
        self.status_updates.lock().unwrap().clone()
    }

    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(unavailable(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_all_orders(&self, page: &PageParams) -> Result<Vec<Order>, StoreError> {
        self.check("find all orders")?;
        Ok(page_of(&self.orders(), page))
    }

    async fn find_order_by_id(&self, order_id: i64) -> Result<Order, StoreError> {
        self.check("find order by id")?;
        if self.lookups_unavailable {
            return Err(unavailable("find order by id"));
        }
        self.orders
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, StoreError> {
        self.check("find order status")?;
        self.orders
            .lock()
            .unwrap()
            .get(&order_id)
            .map(|o| o.status)
            .ok_or(StoreError::Query {
                operation: "find order status",
                source: sqlx::Error::RowNotFound,
            })
    }

    async fn save_order(&self, order: &Order) -> Result<i64, StoreError> {
        self.check("save order")?;
        let mut orders = self.orders.lock().unwrap();
        let id = orders.keys().next_back().map_or(1, |last| last + 1);

        let mut stored = order.clone();
        stored.id = id;
        for (line, item) in stored.items.iter_mut().enumerate() {
            item.id = line as i64 + 1;
        }
        orders.insert(id, stored);
        Ok(id)
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), StoreError> {
        self.check("update order status")?;
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(&order_id).ok_or(StoreError::NotFound)?;
        order.status = status;
        self.status_updates.lock().unwrap().push((order_id, status));
        Ok(())
    }
}

// ============================================================================
// Gateways
// ============================================================================

/// Answers every POST with one canned response and records the request.
pub struct StubTransport {
    status: u16,
    body: String,
    requests: Mutex<Vec<(String, serde_json::Value)>>,
}

impl StubTransport {
    pub fn respond(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, serde_json::Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, reqwest::Error> {
        let json = serde_json::from_slice(&body).unwrap();
        self.requests.lock().unwrap().push((url.to_string(), json));
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone().into_bytes(),
        })
    }
}

pub struct StubAuthorizer {
    authorized: bool,
}

impl StubAuthorizer {
    pub fn allowing() -> Self {
        Self { authorized: true }
    }

    pub fn denying() -> Self {
        Self { authorized: false }
    }
}

#[async_trait]
impl Authorizer for StubAuthorizer {
    async fn authorize_user(&self, cpf: &str) -> Result<AuthorizerResponse, GatewayError> {
        if !self.authorized {
            return Err(GatewayError::Unauthorized);
        }
        Ok(AuthorizerResponse {
            is_authorized: true,
            message: "authorized".to_string(),
            user: AuthorizedUser {
                cpf: cpf.to_string(),
                ..AuthorizedUser::default()
            },
        })
    }
}

pub struct StubPaymentGateway {
    outcome: Result<String, u16>,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl StubPaymentGateway {
    pub fn returning(qr_code: &str) -> Self {
        Self {
            outcome: Ok(qr_code.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: Err(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn generate_payment_qr_code(&self, request: &PaymentRequest) -> Result<PaymentQrCode, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(qr_code) => Ok(PaymentQrCode { qr_code: qr_code.clone() }),
            Err(status) => Err(GatewayError::PaymentFailed { status: *status }),
        }
    }
}

// ============================================================================
// Messaging
// ============================================================================

fn broker_down(topic: &str) -> BrokerError {
    BrokerError::Publish {
        topic: topic.to_string(),
        source: KafkaError::Canceled,
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<ProductionOrder>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<ProductionOrder> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn notify_production(&self, order: &ProductionOrder) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError::Publish {
                order_id: order.id,
                source: broker_down("orders-production"),
            });
        }
        self.notifications.lock().unwrap().push(order.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub destination: String,
    pub key: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedMessage>>,
    failing: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, destination: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        if self.failing {
            return Err(broker_down(destination));
        }
        self.published.lock().unwrap().push(PublishedMessage {
            destination: destination.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

/// Delivers a fixed list of payloads, then returns.
pub struct ScriptedSubscription {
    topic: String,
    messages: Vec<Vec<u8>>,
}

impl ScriptedSubscription {
    pub fn new(topic: &str, messages: Vec<Vec<u8>>) -> Self {
        Self {
            topic: topic.to_string(),
            messages,
        }
    }
}

#[async_trait]
impl Subscription for ScriptedSubscription {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn start(&self, handler: Arc<dyn MessageHandler>) {
        for message in &self.messages {
            let _ = handler.handle(message).await;
        }
    }
}

// ============================================================================
// Use Case
// ============================================================================

type ErrorFactory = fn() -> OrderError;

#[derive(Default)]
pub struct RecordingOrderUseCase {
    orders: Mutex<BTreeMap<i64, Order>>,
    submissions: Mutex<Vec<OrderSubmission>>,
    status_updates: Mutex<Vec<(i64, OrderStatus)>>,
    creation_error: Option<ErrorFactory>,
    failing_updates: bool,
}

impl RecordingOrderUseCase {
    /// Every status update fails with `OrderError::NotFound`.
    pub fn failing_updates() -> Self {
        Self {
            failing_updates: true,
            ..Self::default()
        }
    }

    pub fn rejecting_creation(mut self, error: ErrorFactory) -> Self {
        self.creation_error = Some(error);
        self
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        *self.orders.lock().unwrap() = orders.into_iter().map(|o| (o.id, o)).collect();
        self
    }

    pub fn submissions(&self) -> Vec<OrderSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn status_updates(&self) -> Vec<(i64, OrderStatus)> {
        self.status_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderUseCase for RecordingOrderUseCase {
    async fn get_all_orders(&self, page: PageParams) -> Result<Page<Order>, OrderError> {
        let orders: Vec<Order> = self.orders.lock().unwrap().values().cloned().collect();
        Ok(Page::build(page_of(&orders, &page), page))
    }

    async fn get_order_status(&self, order_id: i64) -> Result<OrderStatus, OrderError> {
        self.orders
            .lock()
            .unwrap()
            .get(&order_id)
            .map(|o| o.status)
            .ok_or_else(|| OrderError::Store(unavailable("find order status")))
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<(), OrderError> {
        if self.failing_updates {
            return Err(OrderError::NotFound(order_id));
        }
        self.status_updates.lock().unwrap().push((order_id, status));
        Ok(())
    }

    async fn create_order(&self, submission: OrderSubmission) -> Result<OrderCreated, OrderError> {
        if let Some(error) = self.creation_error {
            return Err(error());
        }
        self.submissions.lock().unwrap().push(submission);
        Ok(OrderCreated {
            qr_code: "mercadopago123456".to_string(),
            order_id: 1,
        })
    }
}
