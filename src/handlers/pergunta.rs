// src/handlers/pergunta.rs

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::pergunta::{PerguntaComAutor, PerguntaForm},
    utils::{html::clean_html, session::Claims},
};

// Questions are listed in creation order: a flat Q&A thread reads top-down.
const LISTAGEM: &str = "SELECT p.id, p.id_anuncio, p.id_usuario, u.nome, p.pergunta, \
                        p.created_at \
                        FROM pergunta p \
                        JOIN usuario u ON p.id_usuario = u.id";

/// GET /pergunta - every question on every listing.
pub async fn listar(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let perguntas =
        sqlx::query_as::<_, PerguntaComAutor>(&format!("{LISTAGEM} ORDER BY p.id"))
            .fetch_all(&pool)
            .await?;

    Ok(Json(perguntas))
}

/// GET /pergunta/{id_anuncio} - questions on one listing.
pub async fn listar_do_anuncio(
    State(pool): State<SqlitePool>,
    Path(id_anuncio): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let perguntas = sqlx::query_as::<_, PerguntaComAutor>(&format!(
        "{LISTAGEM} WHERE p.id_anuncio = ? ORDER BY p.id"
    ))
    .bind(id_anuncio)
    .fetch_all(&pool)
    .await?;

    Ok(Json(perguntas))
}

/// POST /pergunta/nova - asks a question as the current identity.
pub async fn nova(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<PerguntaForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let anuncio = sqlx::query_scalar::<_, i64>("SELECT id FROM anuncio WHERE id = ?")
        .bind(form.id_anuncio)
        .fetch_optional(&pool)
        .await?;

    if anuncio.is_none() {
        return Err(AppError::NotFound("Listing not found".to_string()));
    }

    sqlx::query(
        "INSERT INTO pergunta (id_anuncio, id_usuario, pergunta, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(form.id_anuncio)
    .bind(claims.user_id())
    .bind(clean_html(form.pergunta.trim()))
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await?;

    Ok(Redirect::to(&format!("/pergunta/{}", form.id_anuncio)))
}
