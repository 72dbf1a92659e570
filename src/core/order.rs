//! The order record and its status workflow
//!
//! An [`Order`] moves through two independent, monotonic transitions:
//! `pendente → aceito` (operator acceptance) and `notificado: false → true`
//! (delivery acknowledgement). Neither transition ever reverses and orders
//! are never deleted.
//!
//! Field names and status values are serialized in their original Portuguese
//! forms, which are both the wire format and the on-disk format.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Acceptance status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, awaiting operator acceptance
    Pendente,
    /// Accepted by an operator
    Aceito,
}

/// A customer submission tracked through acceptance and notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier, assigned at creation
    pub id: i64,

    /// Opaque order payload supplied by the client
    pub pedido: String,

    /// Opaque requester identifier (e.g. a phone number)
    pub numero: String,

    /// Acceptance status, `pendente → aceito` only
    pub status: OrderStatus,

    /// Delivery acknowledgement flag, `false → true` only
    pub notificado: bool,
}

impl Order {
    /// Create a freshly submitted order
    pub fn new(id: i64, pedido: String, numero: String) -> Self {
        Self {
            id,
            pedido,
            numero,
            status: OrderStatus::Pendente,
            notificado: false,
        }
    }

    /// Accepted but not yet acknowledged by the requester's client
    pub fn awaiting_delivery(&self) -> bool {
        self.status == OrderStatus::Aceito && !self.notificado
    }
}

/// Allocate an id for a new order.
///
/// Ids are seeded from the wall clock in milliseconds but forced strictly
/// above every id already in the collection, so back-to-back creations within
/// the same millisecond still get distinct ids. Callers must hold the
/// service's write lock for the uniqueness guarantee to hold.
pub fn next_order_id(orders: &[Order]) -> i64 {
    let max_id = orders.iter().map(|o| o.id).max().unwrap_or(0);
    Utc::now().timestamp_millis().max(max_id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_start_pendente_and_unnotified() {
        let order = Order::new(1, "2x coffee".to_string(), "5511999999999".to_string());

        assert_eq!(order.status, OrderStatus::Pendente);
        assert!(!order.notificado);
        assert!(!order.awaiting_delivery());
    }

    #[test]
    fn awaiting_delivery_requires_accepted_and_unnotified() {
        let mut order = Order::new(1, "p".to_string(), "n".to_string());

        order.status = OrderStatus::Aceito;
        assert!(order.awaiting_delivery());

        order.notificado = true;
        assert!(!order.awaiting_delivery());
    }

    #[test]
    fn ids_stay_above_the_existing_maximum() {
        // Simulate a collection whose newest id is far in the future, as if
        // the clock had jumped backwards.
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let orders = vec![Order::new(far_future, "p".to_string(), "n".to_string())];

        assert_eq!(next_order_id(&orders), far_future + 1);
    }

    #[test]
    fn back_to_back_ids_are_distinct() {
        let mut orders = Vec::new();
        for _ in 0..100 {
            let id = next_order_id(&orders);
            orders.push(Order::new(id, "p".to_string(), "n".to_string()));
        }

        let mut ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn status_serializes_to_portuguese_lowercase() {
        let order = Order::new(1, "p".to_string(), "n".to_string());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["status"], "pendente");
        assert_eq!(json["notificado"], false);
    }
}
