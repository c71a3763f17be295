use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'favorito' table in the database.
/// At most one row exists per (user, listing) pair.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Favorito {
    pub id: i64,
    pub id_usuario: i64,
    pub id_anuncio: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for a favorited listing, including joined listing info.
#[derive(Debug, Serialize, FromRow)]
pub struct FavoritoComAnuncio {
    pub id_anuncio: i64,
    pub anunciocol: String,
    pub id_categoria: i64,
    pub favoritado_em: chrono::DateTime<chrono::Utc>,
}
