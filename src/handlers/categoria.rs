// src/handlers/categoria.rs

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::categoria::{Categoria, CategoriaForm},
    utils::forms::non_empty,
};

/// GET /categoria - all categories.
pub async fn listar(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let categorias =
        sqlx::query_as::<_, Categoria>("SELECT id, nome, descricao FROM categoria ORDER BY id")
            .fetch_all(&pool)
            .await?;

    Ok(Json(categorias))
}

/// POST /categoria/criar.
/// A blank `nome` is rejected naming the field.
pub async fn criar(
    State(pool): State<SqlitePool>,
    Form(form): Form<CategoriaForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    sqlx::query("INSERT INTO categoria (nome, descricao) VALUES (?, ?)")
        .bind(form.nome.trim())
        .bind(non_empty(form.descricao))
        .execute(&pool)
        .await?;

    Ok(Redirect::to("/categoria"))
}

/// GET /categoria/editar/{id} - data for the edit form.
/// A missing id is non-fatal: back to the list.
pub async fn editar_form(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let categoria = sqlx::query_as::<_, Categoria>(
        "SELECT id, nome, descricao FROM categoria WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    Ok(match categoria {
        Some(categoria) => Json(categoria).into_response(),
        None => Redirect::to("/categoria").into_response(),
    })
}

/// POST /categoria/editar/{id}.
/// Updating a missing id is a no-op that still redirects to the list.
pub async fn editar(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Form(form): Form<CategoriaForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    sqlx::query("UPDATE categoria SET nome = ?, descricao = ? WHERE id = ?")
        .bind(form.nome.trim())
        .bind(non_empty(form.descricao))
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Redirect::to("/categoria"))
}

/// GET /categoria/deletar/{id}.
///
/// A missing id is a no-op. A category still referenced by listings is kept:
/// the RESTRICT foreign key fails the delete and surfaces as a conflict.
pub async fn deletar(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("DELETE FROM categoria WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Redirect::to("/categoria"))
}
