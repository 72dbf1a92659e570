//! Order workflow on top of a [`DocumentStore`]
//!
//! Every mutation is a full load-mutate-save cycle against the injected
//! store. Cycles are serialized through a single async mutex, so two
//! concurrent mutations can never both compute their update from the same
//! stale snapshot (the lost-update hazard of read-modify-write stores).
//! Reads bypass the lock; the store's atomic save guarantees they never see
//! a torn document.

use crate::core::error::{ApiError, NotFoundError, ValidationError};
use crate::core::order::{Order, OrderStatus, next_order_id};
use crate::storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Business logic for order intake, acceptance and acknowledgement
pub struct OrderService {
    store: Arc<dyn DocumentStore<Vec<Order>>>,
    write_lock: Mutex<()>,
}

impl OrderService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn DocumentStore<Vec<Order>>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Submit a new order.
    ///
    /// Fails with a validation error when either field is empty; otherwise
    /// appends a `pendente`, unnotified record with a fresh unique id and
    /// returns it.
    pub async fn create_order(&self, pedido: &str, numero: &str) -> Result<Order, ApiError> {
        if pedido.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "pedido" }.into());
        }
        if numero.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "numero" }.into());
        }

        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load().await?;

        let order = Order::new(
            next_order_id(&orders),
            pedido.to_string(),
            numero.to_string(),
        );
        orders.push(order.clone());
        self.store.save(&orders).await?;

        tracing::info!(id = order.id, numero = %order.numero, "order created");
        Ok(order)
    }

    /// Full collection, insertion order preserved
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.store.load().await?)
    }

    /// Accepted orders not yet acknowledged, insertion order preserved
    pub async fn list_unnotified_accepted(&self) -> Result<Vec<Order>, ApiError> {
        let orders = self.store.load().await?;
        Ok(orders.into_iter().filter(Order::awaiting_delivery).collect())
    }

    /// Mark the order as accepted by an operator. Idempotent.
    pub async fn accept_order(&self, id: i64) -> Result<Order, ApiError> {
        let order = self
            .update_order(id, |order| order.status = OrderStatus::Aceito)
            .await?;
        tracing::info!(id, "order accepted");
        Ok(order)
    }

    /// Mark the order's status as delivered to the requester's client.
    /// Idempotent.
    ///
    /// Deliberately permissive: succeeds even while the order is still
    /// `pendente`, matching the original workflow.
    pub async fn mark_notified(&self, id: i64) -> Result<Order, ApiError> {
        let order = self
            .update_order(id, |order| order.notificado = true)
            .await?;
        tracing::info!(id, "order marked notified");
        Ok(order)
    }

    /// One serialized load-mutate-save cycle on the order with `id`
    async fn update_order(
        &self,
        id: i64,
        mutate: impl FnOnce(&mut Order),
    ) -> Result<Order, ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load().await?;

        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(NotFoundError::Order { id })?;
        mutate(order);
        let updated = order.clone();

        self.store.save(&orders).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::storage::in_memory::SaveFailingStore;

    fn service() -> OrderService {
        OrderService::new(Arc::new(InMemoryStore::<Vec<Order>>::new()))
    }

    #[tokio::test]
    async fn create_appends_a_pendente_unnotified_record() {
        let service = service();

        let order = service
            .create_order("2x coffee", "5511999999999")
            .await
            .unwrap();

        assert_eq!(order.pedido, "2x coffee");
        assert_eq!(order.numero, "5511999999999");
        assert_eq!(order.status, OrderStatus::Pendente);
        assert!(!order.notificado);

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders, vec![order]);
    }

    #[tokio::test]
    async fn create_rejects_empty_fields() {
        let service = service();

        for (pedido, numero) in [("", "123"), ("   ", "123"), ("coffee", ""), ("coffee", " ")] {
            let err = service.create_order(pedido, numero).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }

        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_creates_get_distinct_ids() {
        let service = service();

        for i in 0..20 {
            service
                .create_order(&format!("order {}", i), "123")
                .await
                .unwrap();
        }

        let mut ids: Vec<i64> = service
            .list_orders()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn concurrent_creates_lose_no_updates() {
        let service = Arc::new(service());

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create_order(&format!("order {}", i), "123").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 16);

        let mut ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn accept_transitions_and_is_idempotent() {
        let service = service();
        let order = service.create_order("coffee", "123").await.unwrap();

        let accepted = service.accept_order(order.id).await.unwrap();
        assert_eq!(accepted.status, OrderStatus::Aceito);
        assert!(!accepted.notificado);

        let again = service.accept_order(order.id).await.unwrap();
        assert_eq!(again, accepted);
    }

    #[tokio::test]
    async fn mark_notified_is_idempotent_and_keeps_status() {
        let service = service();
        let order = service.create_order("coffee", "123").await.unwrap();
        service.accept_order(order.id).await.unwrap();

        let notified = service.mark_notified(order.id).await.unwrap();
        assert!(notified.notificado);
        assert_eq!(notified.status, OrderStatus::Aceito);

        let again = service.mark_notified(order.id).await.unwrap();
        assert_eq!(again, notified);
    }

    #[tokio::test]
    async fn mark_notified_is_allowed_while_still_pendente() {
        let service = service();
        let order = service.create_order("coffee", "123").await.unwrap();

        let notified = service.mark_notified(order.id).await.unwrap();
        assert!(notified.notificado);
        assert_eq!(notified.status, OrderStatus::Pendente);
    }

    #[tokio::test]
    async fn unknown_ids_fail_not_found_without_side_effects() {
        let service = service();
        let order = service.create_order("coffee", "123").await.unwrap();
        let before = service.list_orders().await.unwrap();

        let err = service.accept_order(order.id + 1).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = service.mark_notified(order.id + 1).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert_eq!(service.list_orders().await.unwrap(), before);
    }

    #[tokio::test]
    async fn unnotified_accepted_filter_is_exact_and_ordered() {
        let service = service();

        let a = service.create_order("a", "1").await.unwrap();
        let b = service.create_order("b", "2").await.unwrap();
        let c = service.create_order("c", "3").await.unwrap();

        service.accept_order(a.id).await.unwrap();
        service.accept_order(c.id).await.unwrap();
        service.mark_notified(a.id).await.unwrap();

        let pending_delivery = service.list_unnotified_accepted().await.unwrap();
        let ids: Vec<i64> = pending_delivery.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![c.id]);

        // b is still pendente, a is already notified.
        assert!(!pending_delivery.iter().any(|o| o.id == b.id));
    }

    #[tokio::test]
    async fn failed_save_surfaces_as_storage_error() {
        let service = OrderService::new(Arc::new(SaveFailingStore::<Vec<Order>>::new()));

        let err = service.create_order("coffee", "123").await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
