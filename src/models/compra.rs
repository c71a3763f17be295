use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'compra' table in the database.
///
/// A checkout stub: payment method and shipping fee are fixed placeholder
/// values, there is no gateway integration or price computation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Compra {
    pub id: i64,
    pub id_usuario: i64,
    pub forma_pagamento: String,
    pub frete: f64,
    /// Moment the purchase was created.
    pub data: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'compra_item' table in the database.
/// Each checkout produces exactly one line item.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompraItem {
    pub id: i64,
    pub id_compra: i64,
    pub id_anuncio: i64,
    pub quantidade: i64,
}
