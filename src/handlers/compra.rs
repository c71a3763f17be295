// src/handlers/compra.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;

use crate::{error::AppError, utils::session::Claims};

// Placeholder checkout policy; there is no payment integration behind it.
const FORMA_PAGAMENTO: &str = "boleto";
const FRETE: f64 = 15.0;

/// GET /comprar/{id_anuncio} - checkout stub.
///
/// Creates one purchase for the current identity and exactly one line item
/// (quantity 1) linking it to the listing. Both inserts run inside one
/// transaction: the id generated by the first feeds the second, and neither
/// persists without the other.
pub async fn comprar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id_anuncio): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let anuncio = sqlx::query_scalar::<_, i64>("SELECT id FROM anuncio WHERE id = ?")
        .bind(id_anuncio)
        .fetch_optional(&pool)
        .await?;

    if anuncio.is_none() {
        return Err(AppError::NotFound("Listing not found".to_string()));
    }

    let mut tx = pool.begin().await?;

    let compra = sqlx::query(
        "INSERT INTO compra (id_usuario, forma_pagamento, frete, data) VALUES (?, ?, ?, ?)",
    )
    .bind(claims.user_id())
    .bind(FORMA_PAGAMENTO)
    .bind(FRETE)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;

    let id_compra = compra.last_insert_rowid();

    sqlx::query("INSERT INTO compra_item (id_compra, id_anuncio, quantidade) VALUES (?, ?, 1)")
        .bind(id_compra)
        .bind(id_anuncio)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("User {} purchased listing {}", claims.user_id(), id_anuncio);

    Ok(Redirect::to("/anuncio"))
}
