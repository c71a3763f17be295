// src/handlers/favorito.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;

use crate::{error::AppError, models::favorito::FavoritoComAnuncio, utils::session::Claims};

/// GET /favoritar/{id_anuncio} - toggle, not an idempotent add.
///
/// An existing favorite for (current user, listing) is removed, a missing
/// one is created. The read-check-write runs inside one transaction; the
/// unique (id_usuario, id_anuncio) constraint is the backstop for two
/// concurrent inserts, and a violation there means the other request already
/// favorited the listing, which is the state this one wanted.
pub async fn favoritar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id_anuncio): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM favorito WHERE id_usuario = ? AND id_anuncio = ?",
    )
    .bind(user_id)
    .bind(id_anuncio)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        sqlx::query("DELETE FROM favorito WHERE id_usuario = ? AND id_anuncio = ?")
            .bind(user_id)
            .bind(id_anuncio)
            .execute(&mut *tx)
            .await?;
    } else {
        let insert = sqlx::query(
            "INSERT INTO favorito (id_usuario, id_anuncio, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(id_anuncio)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            let concurrent_duplicate = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.is_unique_violation()
            );
            if !concurrent_duplicate {
                return Err(e.into());
            }
        }
    }

    tx.commit().await?;

    Ok(Redirect::to("/anuncio"))
}

/// GET /favoritos - the current identity's favorites with listing info.
pub async fn listar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let favoritos = sqlx::query_as::<_, FavoritoComAnuncio>(
        "SELECT f.id_anuncio, a.anunciocol, a.id_categoria, f.created_at AS favoritado_em \
         FROM favorito f \
         JOIN anuncio a ON f.id_anuncio = a.id \
         WHERE f.id_usuario = ? \
         ORDER BY f.created_at DESC",
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(favoritos))
}
