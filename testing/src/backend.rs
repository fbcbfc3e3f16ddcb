//! Scripted [`OrderBackend`] double
//!
//! Responses are configured up front; every call is counted so tests can
//! assert that, for example, a rejected checkout never reached the network.

use async_trait::async_trait;
use pickup_backend::{
    BackendError, CreateOrderRequest, CreatedOrder, OrderBackend, OrderRecord, Product,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

/// Number of calls made to each backend operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendCalls {
    /// `list_products` calls
    pub list_products: usize,
    /// `create_order` calls
    pub create_order: usize,
    /// `get_order` calls
    pub get_order: usize,
    /// `list_orders` calls
    pub list_orders: usize,
    /// `cancel_order` calls
    pub cancel_order: usize,
}

impl BackendCalls {
    /// Total number of calls
    #[must_use]
    pub const fn total(&self) -> usize {
        self.list_products + self.create_order + self.get_order + self.list_orders + self.cancel_order
    }
}

#[derive(Debug)]
struct Script {
    products: Result<Vec<Product>, BackendError>,
    creates: VecDeque<Result<CreatedOrder, BackendError>>,
    orders: HashMap<String, OrderRecord>,
    get_order_error: Option<BackendError>,
    order_list: Result<Vec<OrderRecord>, BackendError>,
    cancel: Result<(), BackendError>,
    calls: BackendCalls,
    create_requests: Vec<CreateOrderRequest>,
    cancellations: Vec<(String, String)>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            products: Ok(Vec::new()),
            creates: VecDeque::new(),
            orders: HashMap::new(),
            get_order_error: None,
            order_list: Ok(Vec::new()),
            cancel: Ok(()),
            calls: BackendCalls::default(),
            create_requests: Vec::new(),
            cancellations: Vec::new(),
        }
    }
}

/// In-process backend answering from a script
///
/// Clones share the script and call log.
#[derive(Clone, Debug, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    create_gate: Option<Arc<Semaphore>>,
}

impl ScriptedBackend {
    /// Backend with an empty catalog and no scripted orders
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `products` from `list_products`
    #[must_use]
    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.script().products = Ok(products);
        self
    }

    /// Queue a successful `create_order` response
    #[must_use]
    pub fn with_created_order(self, order_id: &str) -> Self {
        self.push_create(Ok(CreatedOrder {
            order_id: order_id.to_string(),
        }));
        self
    }

    /// Queue any `create_order` response
    pub fn push_create(&self, response: Result<CreatedOrder, BackendError>) {
        self.script().creates.push_back(response);
    }

    /// Make `get_order` return `order` for its id
    #[must_use]
    pub fn with_order(self, order: OrderRecord) -> Self {
        self.script().orders.insert(order.order_id.clone(), order);
        self
    }

    /// Serve `orders` from `list_orders`
    #[must_use]
    pub fn with_order_list(self, orders: Vec<OrderRecord>) -> Self {
        self.script().order_list = Ok(orders);
        self
    }

    /// Fail `list_products` with `error`
    pub fn fail_products(&self, error: BackendError) {
        self.script().products = Err(error);
    }

    /// Fail every `get_order` with `error`
    pub fn fail_get_order(&self, error: BackendError) {
        self.script().get_order_error = Some(error);
    }

    /// Fail `list_orders` with `error`
    pub fn fail_order_list(&self, error: BackendError) {
        self.script().order_list = Err(error);
    }

    /// Fail `cancel_order` with `error`
    pub fn fail_cancel(&self, error: BackendError) {
        self.script().cancel = Err(error);
    }

    /// Hold every `create_order` call until [`Self::release_creates`]
    #[must_use]
    pub fn with_held_creates(mut self) -> Self {
        self.create_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `n` held `create_order` calls proceed
    pub fn release_creates(&self, n: usize) {
        if let Some(gate) = &self.create_gate {
            gate.add_permits(n);
        }
    }

    /// Calls made so far
    #[must_use]
    pub fn calls(&self) -> BackendCalls {
        self.script().calls
    }

    /// Bodies received by `create_order`, in order
    #[must_use]
    pub fn create_requests(&self) -> Vec<CreateOrderRequest> {
        self.script().create_requests.clone()
    }

    /// `(order_id, reason)` pairs received by `cancel_order`
    #[must_use]
    pub fn cancellations(&self) -> Vec<(String, String)> {
        self.script().cancellations.clone()
    }
}

#[async_trait]
impl OrderBackend for ScriptedBackend {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let mut script = self.script();
        script.calls.list_products += 1;
        script.products.clone()
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, BackendError> {
        {
            let mut script = self.script();
            script.calls.create_order += 1;
            script.create_requests.push(request);
        }

        if let Some(gate) = &self.create_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.script()
            .creates
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::RequestFailed("no scripted response".to_string())))
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderRecord, BackendError> {
        let mut script = self.script();
        script.calls.get_order += 1;
        if let Some(error) = &script.get_order_error {
            return Err(error.clone());
        }
        script
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(order_id.to_string()))
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, BackendError> {
        let mut script = self.script();
        script.calls.list_orders += 1;
        script.order_list.clone()
    }

    async fn cancel_order(&self, order_id: &str, reason: &str) -> Result<(), BackendError> {
        let mut script = self.script();
        script.calls.cancel_order += 1;
        script
            .cancellations
            .push((order_id.to_string(), reason.to_string()));
        script.cancel.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_responses_are_served_in_order() {
        let backend = ScriptedBackend::new().with_created_order("A100");
        backend.push_create(Err(BackendError::Api { status: 500, message: None }));

        let request = CreateOrderRequest {
            items: Vec::new(),
            customer_name: "Ann".to_string(),
            phone_number: "9876543210".to_string(),
            room_number: "1".to_string(),
            notes: String::new(),
        };

        assert_eq!(backend.create_order(request.clone()).await.unwrap().order_id, "A100");
        assert!(backend.create_order(request.clone()).await.is_err());
        assert!(matches!(
            backend.create_order(request).await,
            Err(BackendError::RequestFailed(_))
        ));
        assert_eq!(backend.calls().create_order, 3);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let backend = ScriptedBackend::new();
        assert_eq!(
            backend.get_order("NOPE").await,
            Err(BackendError::NotFound("NOPE".to_string()))
        );
        assert_eq!(backend.calls().total(), 1);
    }
}
