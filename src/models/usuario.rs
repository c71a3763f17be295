// src/models/usuario.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'usuario' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,

    pub nome: String,

    /// Stored lowercase; unique across all users.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub senha: String,

    /// Brazilian tax id; unique when present.
    pub cpf: Option<String>,

    pub dt_nascimento: Option<NaiveDate>,

    pub telefone: Option<String>,
    pub rua: Option<String>,
    pub cidade: Option<String>,
    pub bairro: Option<String>,
    pub numero: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Full profile form: POST /usuario/novo, POST /usuario/editar/{id} and
/// POST /minha-conta all submit this field set.
///
/// `senha` is required on create and optional on edit (a blank value keeps
/// the stored hash); the handlers enforce the difference. `cpf` and
/// `dt_nascimento` get their format checks in `utils::forms` after
/// empty-string normalization.
#[derive(Debug, Deserialize, Validate)]
pub struct UsuarioForm {
    #[validate(length(min = 1, max = 256, message = "nome must not be blank"))]
    pub nome: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    pub senha: Option<String>,
    pub cpf: Option<String>,
    pub dt_nascimento: Option<String>,
    pub telefone: Option<String>,
    pub rua: Option<String>,
    pub cidade: Option<String>,
    pub bairro: Option<String>,
    pub numero: Option<String>,
}

/// Body of POST /login. The page carries two forms posting to the same
/// endpoint; the presence of `senha_cadastro` selects registration.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    // login form
    pub email: Option<String>,
    pub senha: Option<String>,

    // registration form
    pub nome: Option<String>,
    pub email_cadastro: Option<String>,
    pub senha_cadastro: Option<String>,
}
