// src/handlers/mod.rs

pub mod anuncio;
pub mod auth;
pub mod categoria;
pub mod compra;
pub mod conta;
pub mod favorito;
pub mod pergunta;
pub mod relatorio;
pub mod usuario;
