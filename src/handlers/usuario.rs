// src/handlers/usuario.rs

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::usuario::{Usuario, UsuarioForm},
    utils::{
        forms::{non_empty, normalize_email, parse_birth_date, parse_cpf},
        hash::hash_password,
        session::Claims,
    },
};

const USUARIO_COLUMNS: &str = "id, nome, email, senha, cpf, dt_nascimento, telefone, rua, \
                               cidade, bairro, numero, created_at";

/// Classifies unique violations on the usuario table so the caller learns
/// which of the two unique fields collided.
pub(crate) fn map_usuario_unique(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = db_err.message().to_string();
            if message.contains("email") {
                return AppError::Conflict("Email is already registered".to_string());
            }
            if message.contains("cpf") {
                return AppError::Conflict("CPF is already registered".to_string());
            }
        }
    }
    AppError::from(e)
}

/// GET /usuario - all users. Password hashes never serialize.
pub async fn listar(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let usuarios = sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {USUARIO_COLUMNS} FROM usuario ORDER BY id"
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(usuarios))
}

/// POST /usuario/novo - creates a user from the admin-style form.
/// Unlike the profile edit, `senha` is required here.
pub async fn novo(
    State(pool): State<SqlitePool>,
    Form(form): Form<UsuarioForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let senha = non_empty(form.senha.clone())
        .ok_or_else(|| AppError::BadRequest("senha must not be blank".to_string()))?;
    let email = normalize_email(&form.email);
    let cpf = parse_cpf(form.cpf.clone())?;
    let dt_nascimento = parse_birth_date(form.dt_nascimento.clone())?;

    let hashed_senha = hash_password(&senha)?;

    sqlx::query(
        "INSERT INTO usuario \
         (nome, email, senha, cpf, dt_nascimento, telefone, rua, cidade, bairro, numero, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.nome.trim())
    .bind(&email)
    .bind(&hashed_senha)
    .bind(&cpf)
    .bind(dt_nascimento)
    .bind(non_empty(form.telefone))
    .bind(non_empty(form.rua))
    .bind(non_empty(form.cidade))
    .bind(non_empty(form.bairro))
    .bind(non_empty(form.numero))
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .map_err(map_usuario_unique)?;

    Ok(Redirect::to("/usuario"))
}

/// GET /usuario/detalhar/{id}.
pub async fn detalhar(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {USUARIO_COLUMNS} FROM usuario WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(usuario))
}

/// GET /usuario/editar/{id} - data for the edit form.
/// A missing id is non-fatal: back to the list.
pub async fn editar_form(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let usuario = sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {USUARIO_COLUMNS} FROM usuario WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    Ok(match usuario {
        Some(usuario) => Json(usuario).into_response(),
        None => Redirect::to("/usuario").into_response(),
    })
}

/// POST /usuario/editar/{id}.
///
/// Editing a missing id is a no-op that redirects to the list.
pub async fn editar(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Form(form): Form<UsuarioForm>,
) -> Result<impl IntoResponse, AppError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM usuario WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?;

    if exists.is_none() {
        return Ok(Redirect::to("/usuario"));
    }

    aplicar_edicao(&pool, id, form).await?;

    Ok(Redirect::to("/usuario"))
}

/// GET /usuario/deletar/{id}.
///
/// A missing id is a no-op. A user who still owns listings, questions or
/// purchases is kept: the RESTRICT foreign keys fail the delete and surface
/// as a conflict. Favorites go with the user.
pub async fn deletar(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // Deleting yourself would leave this very session dangling.
    if id == claims.user_id() {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    sqlx::query("DELETE FROM usuario WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Redirect::to("/usuario"))
}

/// Applies the profile edit shared by POST /usuario/editar/{id} and
/// POST /minha-conta.
///
/// Every profile field is overwritten from the submitted form; `senha` is
/// the one exception and is only replaced when a new value was supplied.
pub(crate) async fn aplicar_edicao(
    pool: &SqlitePool,
    id: i64,
    form: UsuarioForm,
) -> Result<(), AppError> {
    form.validate()?;

    let email = normalize_email(&form.email);
    let cpf = parse_cpf(form.cpf.clone())?;
    let dt_nascimento = parse_birth_date(form.dt_nascimento.clone())?;

    sqlx::query(
        "UPDATE usuario SET nome = ?, email = ?, cpf = ?, dt_nascimento = ?, telefone = ?, \
         rua = ?, cidade = ?, bairro = ?, numero = ? WHERE id = ?",
    )
    .bind(form.nome.trim())
    .bind(&email)
    .bind(&cpf)
    .bind(dt_nascimento)
    .bind(non_empty(form.telefone))
    .bind(non_empty(form.rua))
    .bind(non_empty(form.cidade))
    .bind(non_empty(form.bairro))
    .bind(non_empty(form.numero))
    .bind(id)
    .execute(pool)
    .await
    .map_err(map_usuario_unique)?;

    if let Some(nova_senha) = non_empty(form.senha) {
        let hashed = hash_password(&nova_senha)?;
        sqlx::query("UPDATE usuario SET senha = ? WHERE id = ?")
            .bind(&hashed)
            .bind(id)
            .execute(pool)
            .await?;
    }

    Ok(())
}
