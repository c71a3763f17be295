// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "beststore_sessao";

/// Session token claims.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// The authenticated user's id.
    pub fn user_id(&self) -> i64 {
        self.sub.parse::<i64>().unwrap_or(0)
    }
}

/// Signs a new session token bound to the user id.
pub fn sign_session(user_id: i64, secret: &str, ttl_secs: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + ttl_secs as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
pub fn verify_session(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    Ok(token_data.claims)
}

/// Builds the session cookie carrying a signed token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Builds the removal cookie used on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .build()
}

/// Reads the current session from a cookie jar, if one is established.
pub fn current_session(jar: &CookieJar, config: &Config) -> Option<Claims> {
    let cookie = jar.get(SESSION_COOKIE)?;
    verify_session(cookie.value(), &config.session_secret).ok()
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests and validates the session cookie. If valid, injects
/// `Claims` into the request extensions for handlers to use. This is a
/// browser-facing application, so the absence of a session redirects to the
/// login page instead of answering 401.
pub async fn auth_middleware(
    State(config): State<Config>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match current_session(&jar, &config) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
