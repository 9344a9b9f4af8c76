use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

pub mod config;
pub mod helper;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod setup;

/// Name of the cookie carrying the signed-in session.
pub const SESSION_COOKIE_NAME: &str = "auth-session";

/// Cookie-backed session shared by the server and the integration tests.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_string())
        .cookie_path("/".to_string())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Strict)
        .build()
}
