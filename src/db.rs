// src/db.rs

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Schema, applied on every startup. There is no migration tooling: the
/// statements are idempotent and create whatever is missing.
///
/// Delete policy: favorites disappear with their user or listing, everything
/// else RESTRICTs so a delete blocked by referencing rows surfaces as a
/// conflict instead of destroying history.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categoria (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    nome       TEXT NOT NULL,
    descricao  TEXT
);

CREATE TABLE IF NOT EXISTS usuario (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    nome           TEXT NOT NULL,
    email          TEXT NOT NULL UNIQUE,
    senha          TEXT NOT NULL,
    cpf            TEXT,
    dt_nascimento  TEXT,
    telefone       TEXT,
    rua            TEXT,
    cidade         TEXT,
    bairro         TEXT,
    numero         TEXT,
    created_at     TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_usuario_cpf
    ON usuario (cpf) WHERE cpf IS NOT NULL;

CREATE TABLE IF NOT EXISTS anuncio (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    anunciocol    TEXT NOT NULL,
    id_categoria  INTEGER NOT NULL REFERENCES categoria (id) ON DELETE RESTRICT,
    id_usuario    INTEGER NOT NULL REFERENCES usuario (id) ON DELETE RESTRICT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS favorito (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    id_usuario  INTEGER NOT NULL REFERENCES usuario (id) ON DELETE CASCADE,
    id_anuncio  INTEGER NOT NULL REFERENCES anuncio (id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    UNIQUE (id_usuario, id_anuncio)
);

CREATE TABLE IF NOT EXISTS pergunta (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    id_anuncio  INTEGER NOT NULL REFERENCES anuncio (id) ON DELETE RESTRICT,
    id_usuario  INTEGER NOT NULL REFERENCES usuario (id) ON DELETE RESTRICT,
    pergunta    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS compra (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    id_usuario       INTEGER NOT NULL REFERENCES usuario (id) ON DELETE RESTRICT,
    forma_pagamento  TEXT NOT NULL,
    frete            REAL NOT NULL,
    data             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS compra_item (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    id_compra   INTEGER NOT NULL REFERENCES compra (id) ON DELETE CASCADE,
    id_anuncio  INTEGER NOT NULL REFERENCES anuncio (id) ON DELETE RESTRICT,
    quantidade  INTEGER NOT NULL DEFAULT 1 CHECK (quantidade >= 1)
);
"#;

/// Opens the connection pool and prepares the database for use.
///
/// Foreign key enforcement is per-connection in SQLite, so it is set through
/// the connect options rather than a one-off PRAGMA on the pool.
pub async fn init(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Applies the schema statement by statement. Also used directly by the
/// integration tests against their own pools.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    Ok(())
}
