//! Sales ledger and weekly history for the dashboard
//!
//! Independent from the order workflow: the ledger document and the weekly
//! history each live in their own file-backed store with no shared state
//! with the order collection. Mutations follow the same serialized
//! load-mutate-save discipline as [`OrderService`](crate::core::OrderService).

use crate::core::error::{ApiError, ValidationError};
use crate::storage::DocumentStore;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Minimum accepted sale value, in the dashboard's currency
pub const MIN_SALE_VALUE: f64 = 13.5;

const SENHA_LEN: usize = 6;
const SENHA_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The whole dashboard document (`banco.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub usuarios: Vec<Customer>,
    #[serde(default)]
    pub vendas: Vec<Sale>,
    /// Group entries are opaque to this service; only their `numero` field
    /// is inspected, for customer removal.
    #[serde(default)]
    pub grupos: Vec<serde_json::Value>,
}

/// A registered customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub numero: String,
    pub senha: String,
    #[serde(default)]
    pub grupos: Vec<String>,
}

/// One recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub numero: String,
    pub valor: f64,
    pub senha: String,
    pub data: DateTime<Utc>,
}

/// One weekly-history entry (`historicoSemanal.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub data: NaiveDate,
    #[serde(rename = "totalSemanaAtual")]
    pub total_semana_atual: f64,
}

/// Business logic for the sales ledger and the weekly history log
pub struct LedgerService {
    ledger: Arc<dyn DocumentStore<LedgerDocument>>,
    history: Arc<dyn DocumentStore<Vec<WeeklyEntry>>>,
    write_lock: Mutex<()>,
}

impl LedgerService {
    pub fn new(
        ledger: Arc<dyn DocumentStore<LedgerDocument>>,
        history: Arc<dyn DocumentStore<Vec<WeeklyEntry>>>,
    ) -> Self {
        Self {
            ledger,
            history,
            write_lock: Mutex::new(()),
        }
    }

    /// The entire dashboard document
    pub async fn dashboard(&self) -> Result<LedgerDocument, ApiError> {
        Ok(self.ledger.load().await?)
    }

    /// Record a sale, registering the customer on first purchase.
    ///
    /// Rejects non-finite values and anything below [`MIN_SALE_VALUE`].
    pub async fn record_sale(&self, numero: &str, valor: f64) -> Result<Sale, ApiError> {
        if numero.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "numero" }.into());
        }
        if !valor.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "valor",
                message: "must be a number".to_string(),
            }
            .into());
        }
        if valor < MIN_SALE_VALUE {
            return Err(ValidationError::InvalidValue {
                field: "valor",
                message: format!("minimum sale value is {}", MIN_SALE_VALUE),
            }
            .into());
        }

        let _guard = self.write_lock.lock().await;
        let mut ledger = self.ledger.load().await?;

        let sale = Sale {
            numero: numero.to_string(),
            valor,
            senha: generate_senha(),
            data: Utc::now(),
        };
        ledger.vendas.push(sale.clone());

        if !ledger.usuarios.iter().any(|u| u.numero == numero) {
            ledger.usuarios.push(Customer {
                numero: numero.to_string(),
                senha: sale.senha.clone(),
                grupos: Vec::new(),
            });
        }

        self.ledger.save(&ledger).await?;
        tracing::info!(numero = %sale.numero, valor = sale.valor, "sale recorded");
        Ok(sale)
    }

    /// Remove a customer and every sale and group entry tied to them.
    ///
    /// Succeeds (as a no-op) when the customer is unknown, matching the
    /// original dashboard behavior.
    pub async fn remove_customer(&self, numero: &str) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut ledger = self.ledger.load().await?;

        ledger.usuarios.retain(|u| u.numero != numero);
        ledger.vendas.retain(|v| v.numero != numero);
        ledger
            .grupos
            .retain(|g| g.get("numero").and_then(|n| n.as_str()) != Some(numero));

        self.ledger.save(&ledger).await?;
        tracing::info!(numero, "customer removed");
        Ok(())
    }

    /// Append the current week's running total to the history log
    pub async fn append_weekly_total(&self, total: f64) -> Result<WeeklyEntry, ApiError> {
        if !total.is_finite() || total <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "totalSemanaAtual",
                message: "must be a positive number".to_string(),
            }
            .into());
        }

        let _guard = self.write_lock.lock().await;
        let mut history = self.history.load().await?;

        let entry = WeeklyEntry {
            data: Utc::now().date_naive(),
            total_semana_atual: total,
        };
        history.push(entry.clone());

        self.history.save(&history).await?;
        Ok(entry)
    }
}

/// Random 6-character lowercase-alphanumeric password for a sale
fn generate_senha() -> String {
    let mut rng = rand::thread_rng();
    (0..SENHA_LEN)
        .map(|_| SENHA_CHARS[rng.gen_range(0..SENHA_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn service() -> LedgerService {
        LedgerService::new(
            Arc::new(InMemoryStore::<LedgerDocument>::new()),
            Arc::new(InMemoryStore::<Vec<WeeklyEntry>>::new()),
        )
    }

    #[tokio::test]
    async fn sale_registers_the_customer_once() {
        let service = service();

        let first = service.record_sale("5511999999999", 20.0).await.unwrap();
        service.record_sale("5511999999999", 30.0).await.unwrap();

        let ledger = service.dashboard().await.unwrap();
        assert_eq!(ledger.vendas.len(), 2);
        assert_eq!(ledger.usuarios.len(), 1);
        assert_eq!(ledger.usuarios[0].numero, "5511999999999");
        // The customer inherits the password of their first sale.
        assert_eq!(ledger.usuarios[0].senha, first.senha);
    }

    #[tokio::test]
    async fn senha_is_six_lowercase_alphanumeric_chars() {
        let sale = service().record_sale("123", 15.0).await.unwrap();

        assert_eq!(sale.senha.len(), 6);
        assert!(
            sale.senha
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
    }

    #[tokio::test]
    async fn sales_below_the_minimum_are_rejected() {
        let service = service();

        for valor in [13.49, 0.0, -5.0, f64::NAN] {
            let err = service.record_sale("123", valor).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
        assert!(service.dashboard().await.unwrap().vendas.is_empty());
    }

    #[tokio::test]
    async fn removing_a_customer_drops_their_sales_and_groups() {
        let store = Arc::new(InMemoryStore::with_document(LedgerDocument {
            usuarios: Vec::new(),
            vendas: Vec::new(),
            grupos: vec![
                serde_json::json!({ "numero": "111", "nome": "vip" }),
                serde_json::json!({ "numero": "222", "nome": "vip" }),
            ],
        }));
        let service = LedgerService::new(store, Arc::new(InMemoryStore::new()));

        service.record_sale("111", 20.0).await.unwrap();
        service.record_sale("222", 20.0).await.unwrap();

        service.remove_customer("111").await.unwrap();

        let ledger = service.dashboard().await.unwrap();
        assert_eq!(ledger.usuarios.len(), 1);
        assert_eq!(ledger.vendas.len(), 1);
        assert_eq!(ledger.vendas[0].numero, "222");
        assert_eq!(ledger.grupos.len(), 1);

        // Unknown customers are a no-op, not an error.
        service.remove_customer("999").await.unwrap();
    }

    #[tokio::test]
    async fn weekly_totals_append_with_todays_date() {
        let service = service();

        let entry = service.append_weekly_total(150.5).await.unwrap();
        assert_eq!(entry.data, Utc::now().date_naive());

        service.append_weekly_total(200.0).await.unwrap();
        let err = service.append_weekly_total(0.0).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
