// src/handlers/conta.rs

use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::usuario::aplicar_edicao,
    models::usuario::{Usuario, UsuarioForm},
    utils::session::Claims,
};

/// GET /minha-conta - the session user's own profile.
pub async fn detalhar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT id, nome, email, senha, cpf, dt_nascimento, telefone, rua, cidade, bairro, \
         numero, created_at FROM usuario WHERE id = ?",
    )
    .bind(claims.user_id())
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(usuario))
}

/// POST /minha-conta - self-service profile edit.
///
/// Same overwrite semantics as /usuario/editar, applied to the caller's own
/// row: every field comes from the form, the password only when a new value
/// was supplied.
pub async fn editar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Form(form): Form<UsuarioForm>,
) -> Result<impl IntoResponse, AppError> {
    aplicar_edicao(&pool, claims.user_id(), form).await?;

    Ok(Redirect::to("/minha-conta"))
}
