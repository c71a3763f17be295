use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'pergunta' table in the database.
/// Questions are a flat list per listing; there is no reply threading.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Pergunta {
    pub id: i64,
    pub id_anuncio: i64,
    pub id_usuario: i64,
    pub pergunta: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Form body for asking a question on a listing.
#[derive(Debug, Deserialize, Validate)]
pub struct PerguntaForm {
    pub id_anuncio: i64,

    #[validate(length(min = 1, max = 1000, message = "pergunta must not be blank"))]
    pub pergunta: String,
}

/// DTO for displaying a question with the asker's name.
#[derive(Debug, Serialize, FromRow)]
pub struct PerguntaComAutor {
    pub id: i64,
    pub id_anuncio: i64,
    pub id_usuario: i64,
    pub nome: String,
    pub pergunta: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
