// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::usuario::LoginForm,
    utils::{
        forms::{non_empty, normalize_email},
        hash::{hash_password, verify_password},
        session::{current_session, removal_cookie, session_cookie, sign_session},
    },
};

/// GET / - home. Everything interesting lives on the listings page.
pub async fn index() -> Redirect {
    Redirect::to("/anuncio")
}

/// GET /login - entry point.
///
/// With a session already established there is nothing to do here; without
/// one, return the page data for the combined login/registration page.
pub async fn login_page(State(config): State<Config>, jar: CookieJar) -> Response {
    if current_session(&jar, &config).is_some() {
        return Redirect::to("/").into_response();
    }

    Json(json!({ "page": "login" })).into_response()
}

/// POST /login - one endpoint, two forms.
///
/// The login page posts either the login fields (`email`, `senha`) or the
/// registration fields (`nome`, `email_cadastro`, `senha_cadastro`); the
/// presence of `senha_cadastro` selects the flow.
pub async fn login_submit(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if form.senha_cadastro.is_some() {
        register(&pool, &config, jar, form).await
    } else {
        login(&pool, &config, jar, form).await
    }
}

/// GET /logout - clears the session cookie.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(removal_cookie());
    (jar, Redirect::to("/login"))
}

/// Registers a new user from the registration half of the login page.
///
/// Rejects duplicate emails with a specific message (unlike login failures,
/// this one is allowed to reveal that the email exists). On success the new
/// user is logged straight in.
async fn register(
    pool: &SqlitePool,
    config: &Config,
    jar: CookieJar,
    form: LoginForm,
) -> Result<Response, AppError> {
    let nome = non_empty(form.nome)
        .ok_or_else(|| AppError::BadRequest("nome must not be blank".to_string()))?;
    let email = non_empty(form.email_cadastro)
        .map(|e| normalize_email(&e))
        .ok_or_else(|| AppError::BadRequest("email_cadastro must not be blank".to_string()))?;
    let senha = non_empty(form.senha_cadastro)
        .ok_or_else(|| AppError::BadRequest("senha_cadastro must not be blank".to_string()))?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM usuario WHERE email = ?")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Email '{}' is already registered",
            email
        )));
    }

    let hashed_senha = hash_password(&senha)?;

    // The unique index is the backstop for a concurrent duplicate that the
    // check above cannot see.
    let result =
        sqlx::query("INSERT INTO usuario (nome, email, senha, created_at) VALUES (?, ?, ?, ?)")
            .bind(&nome)
            .bind(&email)
            .bind(&hashed_senha)
            .bind(chrono::Utc::now())
            .execute(pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict(format!(
                            "Email '{}' is already registered",
                            email
                        ));
                    }
                }
                AppError::from(e)
            })?;

    let user_id = result.last_insert_rowid();
    tracing::info!("Registered user {} ({})", user_id, email);

    let token = sign_session(user_id, &config.session_secret, config.session_ttl_secs)?;
    let jar = jar.add(session_cookie(token));

    Ok((jar, Redirect::to("/")).into_response())
}

/// Authenticates a user from the login half of the login page.
///
/// A failed lookup and a failed password check produce the same generic
/// message so the response does not reveal whether the email exists.
async fn login(
    pool: &SqlitePool,
    config: &Config,
    jar: CookieJar,
    form: LoginForm,
) -> Result<Response, AppError> {
    let email = non_empty(form.email)
        .map(|e| normalize_email(&e))
        .ok_or_else(|| AppError::BadRequest("email must not be blank".to_string()))?;
    let senha = non_empty(form.senha)
        .ok_or_else(|| AppError::BadRequest("senha must not be blank".to_string()))?;

    let row = sqlx::query_as::<_, (i64, String)>("SELECT id, senha FROM usuario WHERE email = ?")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let (user_id, stored_hash) =
        row.ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    if !verify_password(&senha, &stored_hash)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let token = sign_session(user_id, &config.session_secret, config.session_ttl_secs)?;
    let jar = jar.add(session_cookie(token));

    Ok((jar, Redirect::to("/")).into_response())
}
