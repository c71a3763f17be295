use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'categoria' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Categoria {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
}

/// Form body for creating and editing a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoriaForm {
    #[validate(length(min = 1, max = 256, message = "nome must not be blank"))]
    pub nome: String,

    #[validate(length(max = 500, message = "descricao must be at most 500 characters"))]
    pub descricao: Option<String>,
}
