// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{anuncio, auth, categoria, compra, conta, favorito, pergunta, relatorio, usuario},
    state::AppState,
    utils::session::auth_middleware,
};

/// Assembles the main application router.
///
/// * `/login` is the only public surface; everything else sits behind the
///   session middleware, which redirects anonymous requests there.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let public_routes =
        Router::new().route("/login", get(auth::login_page).post(auth::login_submit));

    let protected_routes = Router::new()
        .route("/", get(auth::index))
        .route("/logout", get(auth::logout))
        .route("/categoria", get(categoria::listar))
        .route("/categoria/criar", post(categoria::criar))
        .route(
            "/categoria/editar/{id}",
            get(categoria::editar_form).post(categoria::editar),
        )
        .route("/categoria/deletar/{id}", get(categoria::deletar))
        .route("/usuario", get(usuario::listar))
        .route("/usuario/novo", post(usuario::novo))
        .route("/usuario/detalhar/{id}", get(usuario::detalhar))
        .route(
            "/usuario/editar/{id}",
            get(usuario::editar_form).post(usuario::editar),
        )
        .route("/usuario/deletar/{id}", get(usuario::deletar))
        .route("/anuncio", get(anuncio::listar))
        .route("/anuncio/criar", post(anuncio::criar))
        .route("/pergunta", get(pergunta::listar))
        .route("/pergunta/{id_anuncio}", get(pergunta::listar_do_anuncio))
        .route("/pergunta/nova", post(pergunta::nova))
        .route("/favoritar/{id_anuncio}", get(favorito::favoritar))
        .route("/favoritos", get(favorito::listar))
        .route("/comprar/{id_anuncio}", get(compra::comprar))
        .route("/relatorios/vendas", get(relatorio::vendas))
        .route("/relatorios/compras", get(relatorio::compras))
        .route("/minha-conta", get(conta::detalhar).post(conta::editar))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
