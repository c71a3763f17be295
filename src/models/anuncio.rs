use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'anuncio' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Anuncio {
    pub id: i64,

    /// Free-text body of the listing.
    pub anunciocol: String,

    pub id_categoria: i64,

    /// Owner; always the authenticated identity at creation time.
    pub id_usuario: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Form body for creating a listing.
#[derive(Debug, Deserialize, Validate)]
pub struct AnuncioForm {
    #[validate(length(min = 1, max = 10000, message = "anunciocol must not be blank"))]
    pub anunciocol: String,

    pub id_categoria: i64,
}

/// Page payload for GET /anuncio: every listing plus the ids the current
/// identity has favorited, which drives the favorite toggle in the UI.
#[derive(Debug, Serialize)]
pub struct AnuncioPage {
    pub anuncios: Vec<Anuncio>,
    pub favoritos: Vec<i64>,
}
