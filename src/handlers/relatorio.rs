// src/handlers/relatorio.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

// Render-only report pages. The snapshot computes no aggregates; the
// endpoints exist so the pages are reachable (and only behind the session
// layer, like everything else).

/// GET /relatorios/vendas.
pub async fn vendas() -> impl IntoResponse {
    Json(json!({ "relatorio": "vendas", "linhas": [] }))
}

/// GET /relatorios/compras.
pub async fn compras() -> impl IntoResponse {
    Json(json!({ "relatorio": "compras", "linhas": [] }))
}
