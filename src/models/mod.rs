// src/models/mod.rs

pub mod anuncio;
pub mod categoria;
pub mod compra;
pub mod favorito;
pub mod pergunta;
pub mod usuario;
