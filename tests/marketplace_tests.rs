// tests/marketplace_tests.rs

use beststore::{config::Config, db, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

async fn spawn_app() -> (String, SqlitePool) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    db::create_schema(&pool).await.expect("Failed to create schema");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: "marketplace_test_secret".to_string(),
        session_ttl_secs: 600,
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Registers (and thereby logs in) a fresh user; returns their client and id.
async fn logged_in_user(address: &str, pool: &SqlitePool) -> (reqwest::Client, i64) {
    let client = client();
    let email = format!("u_{}@teste.com", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/login", address))
        .form(&[
            ("nome", "Test User"),
            ("email_cadastro", email.as_str()),
            ("senha_cadastro", "senha123"),
        ])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 303);

    let id: i64 = sqlx::query_scalar("SELECT id FROM usuario WHERE email = ?")
        .bind(&email)
        .fetch_one(pool)
        .await
        .unwrap();

    (client, id)
}

/// Creates a category and a listing owned by the given client's user.
/// Returns the listing id.
async fn seed_listing(address: &str, pool: &SqlitePool, owner: &reqwest::Client) -> i64 {
    let response = owner
        .post(format!("{}/categoria/criar", address))
        .form(&[("nome", "Eletrônicos"), ("descricao", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    let id_categoria: i64 = sqlx::query_scalar("SELECT MAX(id) FROM categoria")
        .fetch_one(pool)
        .await
        .unwrap();
    let id_categoria_form = id_categoria.to_string();

    let response = owner
        .post(format!("{}/anuncio/criar", address))
        .form(&[
            ("anunciocol", "TV 50in"),
            ("id_categoria", id_categoria_form.as_str()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    sqlx::query_scalar("SELECT MAX(id) FROM anuncio")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn favorito_count(pool: &SqlitePool, id_usuario: i64, id_anuncio: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM favorito WHERE id_usuario = ? AND id_anuncio = ?")
        .bind(id_usuario)
        .bind(id_anuncio)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn favorite_toggles_on_repeat_requests() {
    let (address, pool) = spawn_app().await;
    let (user_a, _) = logged_in_user(&address, &pool).await;
    let (user_b, id_b) = logged_in_user(&address, &pool).await;

    let id_anuncio = seed_listing(&address, &pool, &user_a).await;

    // First call favorites.
    let response = user_b
        .get(format!("{}/favoritar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(favorito_count(&pool, id_b, id_anuncio).await, 1);

    // Second call un-favorites: back to the original state.
    user_b
        .get(format!("{}/favoritar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();
    assert_eq!(favorito_count(&pool, id_b, id_anuncio).await, 0);

    // An odd number of calls leaves exactly one row.
    user_b
        .get(format!("{}/favoritar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();
    assert_eq!(favorito_count(&pool, id_b, id_anuncio).await, 1);
}

#[tokio::test]
async fn listing_page_reports_the_current_users_favorites() {
    let (address, pool) = spawn_app().await;
    let (user_a, _) = logged_in_user(&address, &pool).await;
    let (user_b, _) = logged_in_user(&address, &pool).await;

    let id_anuncio = seed_listing(&address, &pool, &user_a).await;

    user_b
        .get(format!("{}/favoritar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();

    // User B sees the listing flagged as favorited.
    let body: serde_json::Value = user_b
        .get(format!("{}/anuncio", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["anuncios"].as_array().unwrap().len(), 1);
    assert_eq!(body["favoritos"], serde_json::json!([id_anuncio]));

    // User A favorited nothing; the listing set is the same.
    let body: serde_json::Value = user_a
        .get(format!("{}/anuncio", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["anuncios"].as_array().unwrap().len(), 1);
    assert_eq!(body["favoritos"], serde_json::json!([]));
}

#[tokio::test]
async fn listing_creation_rejects_dangling_category() {
    let (address, pool) = spawn_app().await;
    let (user, _) = logged_in_user(&address, &pool).await;

    let response = user
        .post(format!("{}/anuncio/criar", address))
        .form(&[("anunciocol", "TV 50in"), ("id_categoria", "9999")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM anuncio")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn questions_are_listed_in_creation_order_with_author() {
    let (address, pool) = spawn_app().await;
    let (user_a, _) = logged_in_user(&address, &pool).await;
    let (user_b, _) = logged_in_user(&address, &pool).await;

    let id_anuncio = seed_listing(&address, &pool, &user_a).await;

    for pergunta in ["Ainda disponível?", "Aceita troca?"] {
        let response = user_b
            .post(format!("{}/pergunta/nova", address))
            .form(&[
                ("id_anuncio", id_anuncio.to_string().as_str()),
                ("pergunta", pergunta),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 303);
    }

    let body: serde_json::Value = user_a
        .get(format!("{}/pergunta/{}", address, id_anuncio))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let perguntas = body.as_array().unwrap();
    assert_eq!(perguntas.len(), 2);
    assert_eq!(perguntas[0]["pergunta"], "Ainda disponível?");
    assert_eq!(perguntas[1]["pergunta"], "Aceita troca?");
    assert_eq!(perguntas[0]["nome"], "Test User");
}

#[tokio::test]
async fn question_requires_text_and_existing_listing() {
    let (address, pool) = spawn_app().await;
    let (user, _) = logged_in_user(&address, &pool).await;
    let id_anuncio = seed_listing(&address, &pool, &user).await;

    // Blank question text names the field.
    let response = user
        .post(format!("{}/pergunta/nova", address))
        .form(&[
            ("id_anuncio", id_anuncio.to_string().as_str()),
            ("pergunta", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["fields"].get("pergunta").is_some());

    // Unknown listing.
    let response = user
        .post(format!("{}/pergunta/nova", address))
        .form(&[("id_anuncio", "9999"), ("pergunta", "Tem garantia?")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn purchase_creates_one_purchase_and_one_linked_item() {
    let (address, pool) = spawn_app().await;
    let (seller, _) = logged_in_user(&address, &pool).await;
    let (buyer, buyer_id) = logged_in_user(&address, &pool).await;

    let id_anuncio = seed_listing(&address, &pool, &seller).await;

    let response = buyer
        .get(format!("{}/comprar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    let compras: Vec<(i64, i64)> =
        sqlx::query_as("SELECT id, id_usuario FROM compra")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(compras.len(), 1);
    let (id_compra, id_usuario) = compras[0];
    assert_eq!(id_usuario, buyer_id);

    let itens: Vec<(i64, i64, i64)> =
        sqlx::query_as("SELECT id_compra, id_anuncio, quantidade FROM compra_item")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(itens.len(), 1);
    assert_eq!(itens[0], (id_compra, id_anuncio, 1));
}

#[tokio::test]
async fn purchase_of_unknown_listing_is_404_and_writes_nothing() {
    let (address, pool) = spawn_app().await;
    let (buyer, _) = logged_in_user(&address, &pool).await;

    let response = buyer
        .get(format!("{}/comprar/9999", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM compra")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn favorites_page_joins_listing_data() {
    let (address, pool) = spawn_app().await;
    let (seller, _) = logged_in_user(&address, &pool).await;
    let (fan, _) = logged_in_user(&address, &pool).await;

    let id_anuncio = seed_listing(&address, &pool, &seller).await;

    fan.get(format!("{}/favoritar/{}", address, id_anuncio))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = fan
        .get(format!("{}/favoritos", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let favoritos = body.as_array().unwrap();
    assert_eq!(favoritos.len(), 1);
    assert_eq!(favoritos[0]["id_anuncio"], id_anuncio);
    assert_eq!(favoritos[0]["anunciocol"], "TV 50in");
}

#[tokio::test]
async fn profile_edit_overwrites_fields_but_keeps_password_when_blank() {
    let (address, pool) = spawn_app().await;
    let (user, id) = logged_in_user(&address, &pool).await;

    let email: String = sqlx::query_scalar("SELECT email FROM usuario WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();

    // Blank senha: every other field is overwritten, the hash stays.
    let response = user
        .post(format!("{}/minha-conta", address))
        .form(&[
            ("nome", "Novo Nome"),
            ("email", email.as_str()),
            ("senha", ""),
            ("cidade", "Recife"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    let (nome, cidade): (String, Option<String>) =
        sqlx::query_as("SELECT nome, cidade FROM usuario WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(nome, "Novo Nome");
    assert_eq!(cidade.as_deref(), Some("Recife"));

    // The old password still logs in.
    let response = client()
        .post(format!("{}/login", address))
        .form(&[("email", email.as_str()), ("senha", "senha123")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    // Supplying a new senha replaces the hash.
    let response = user
        .post(format!("{}/minha-conta", address))
        .form(&[
            ("nome", "Novo Nome"),
            ("email", email.as_str()),
            ("senha", "trocada789"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);

    let old_password = client()
        .post(format!("{}/login", address))
        .form(&[("email", email.as_str()), ("senha", "senha123")])
        .send()
        .await
        .unwrap();
    assert_eq!(old_password.status().as_u16(), 401);

    let new_password = client()
        .post(format!("{}/login", address))
        .form(&[("email", email.as_str()), ("senha", "trocada789")])
        .send()
        .await
        .unwrap();
    assert_eq!(new_password.status().as_u16(), 303);
}

#[tokio::test]
async fn deleting_a_user_with_listings_is_refused() {
    let (address, pool) = spawn_app().await;
    let (seller, seller_id) = logged_in_user(&address, &pool).await;
    let (other, _) = logged_in_user(&address, &pool).await;

    seed_listing(&address, &pool, &seller).await;

    // The seller still owns a listing: the RESTRICT foreign key refuses.
    let response = other
        .get(format!("{}/usuario/deletar/{}", address, seller_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuario WHERE id = ?")
        .bind(seller_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn reports_require_a_session_and_render() {
    let (address, pool) = spawn_app().await;

    let anonymous = client()
        .get(format!("{}/relatorios/vendas", address))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 303);

    let (user, _) = logged_in_user(&address, &pool).await;
    for path in ["/relatorios/vendas", "/relatorios/compras"] {
        let response = user.get(format!("{}{}", address, path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }
}
