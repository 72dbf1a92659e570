//! HTTP handlers mapping the wire contract onto service calls
//!
//! Handlers are a pure adapter: request bodies are validated schemas, every
//! business rule lives in the services, and failures bubble up as
//! [`ApiError`] which already knows its status code and JSON body.
//!
//! Success messages keep the original Portuguese wire strings; dashboard
//! clients match on them.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{ApiError, ValidationError};
use crate::core::ledger::{LedgerDocument, LedgerService};
use crate::core::order::Order;
use crate::core::service::OrderService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub ledger: Arc<LedgerService>,
}

/// Request body for creating an order
///
/// Fields default to empty so that an absent field and an empty field fail
/// validation the same way (400, not a deserialization rejection).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "pedido é obrigatório"))]
    pub pedido: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "numero é obrigatório"))]
    pub numero: String,
}

/// Request body for operations addressing one order
#[derive(Debug, Deserialize)]
pub struct OrderIdRequest {
    pub id: i64,
}

/// Request body for recording a sale
#[derive(Debug, Deserialize, Validate)]
pub struct RecordSaleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "numero é obrigatório"))]
    pub numero: String,

    pub valor: Option<f64>,
}

/// Request body for appending a weekly total
#[derive(Debug, Deserialize)]
pub struct WeeklyHistoryRequest {
    #[serde(rename = "totalSemanaAtual")]
    pub total_semana_atual: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub mensagem: &'static str,
    pub pedido: Order,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub sucesso: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<&'static str>,
}

/// POST /api/pedido
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let order = state.orders.create_order(&body.pedido, &body.numero).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            mensagem: "Pedido salvo com sucesso",
            pedido: order,
        }),
    ))
}

/// GET /api/pedidos
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_orders().await?))
}

/// GET /api/respostas - accepted orders awaiting delivery to the client
pub async fn list_replies(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_unnotified_accepted().await?))
}

/// POST /api/responder
pub async fn accept_order(
    State(state): State<AppState>,
    Json(body): Json<OrderIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.orders.accept_order(body.id).await?;
    Ok(Json(MessageResponse {
        mensagem: "Pedido aceito",
    }))
}

/// POST /api/marcarNotificado
pub async fn mark_notified(
    State(state): State<AppState>,
    Json(body): Json<OrderIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.orders.mark_notified(body.id).await?;
    Ok(Json(MessageResponse {
        mensagem: "Pedido marcado como notificado",
    }))
}

/// GET /api/dados
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<LedgerDocument>, ApiError> {
    Ok(Json(state.ledger.dashboard().await?))
}

/// POST /api/venda
pub async fn record_sale(
    State(state): State<AppState>,
    Json(body): Json<RecordSaleRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    body.validate()?;
    let valor = body
        .valor
        .ok_or(ValidationError::MissingField { field: "valor" })?;
    state.ledger.record_sale(&body.numero, valor).await?;

    Ok(Json(SuccessResponse {
        sucesso: true,
        mensagem: None,
    }))
}

/// DELETE /api/dados/{numero}
pub async fn remove_customer(
    State(state): State<AppState>,
    Path(numero): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.ledger.remove_customer(&numero).await?;
    Ok(Json(SuccessResponse {
        sucesso: true,
        mensagem: None,
    }))
}

/// POST /api/salvarHistoricoSemanal
pub async fn save_weekly_history(
    State(state): State<AppState>,
    Json(body): Json<WeeklyHistoryRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let total = body.total_semana_atual.ok_or(ValidationError::MissingField {
        field: "totalSemanaAtual",
    })?;
    state.ledger.append_weekly_total(total).await?;

    Ok(Json(SuccessResponse {
        sucesso: true,
        mensagem: Some("Histórico semanal salvo com sucesso!"),
    }))
}
