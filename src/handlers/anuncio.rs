// src/handlers/anuncio.rs

use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::anuncio::{Anuncio, AnuncioForm, AnuncioPage},
    utils::{html::clean_html, session::Claims},
};

/// GET /anuncio - every listing, plus the ids the current identity has
/// favorited so the page can render the favorite toggle per listing.
pub async fn listar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let anuncios = sqlx::query_as::<_, Anuncio>(
        "SELECT id, anunciocol, id_categoria, id_usuario, created_at FROM anuncio ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    let favoritos =
        sqlx::query_scalar::<_, i64>("SELECT id_anuncio FROM favorito WHERE id_usuario = ?")
            .bind(claims.user_id())
            .fetch_all(&pool)
            .await?;

    Ok(Json(AnuncioPage {
        anuncios,
        favoritos,
    }))
}

/// POST /anuncio/criar - creates a listing owned by the current identity.
///
/// The category is checked up front so a dangling id comes back as a
/// validation error rather than a foreign key failure from the engine.
pub async fn criar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<AnuncioForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let categoria = sqlx::query_scalar::<_, i64>("SELECT id FROM categoria WHERE id = ?")
        .bind(form.id_categoria)
        .fetch_optional(&pool)
        .await?;

    if categoria.is_none() {
        return Err(AppError::BadRequest(
            "id_categoria does not reference an existing category".to_string(),
        ));
    }

    sqlx::query(
        "INSERT INTO anuncio (anunciocol, id_categoria, id_usuario, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(clean_html(form.anunciocol.trim()))
    .bind(form.id_categoria)
    .bind(claims.user_id())
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await?;

    Ok(Redirect::to("/anuncio"))
}
