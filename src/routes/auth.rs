use crate::helper::page_helpers;
use crate::middleware::{AuthContext, LOGIN_PATH, SESSION_USER_KEY};
use crate::models::db_operations::users_db_operations;
use actix_csrf::extractor::{Csrf, CsrfGuarded, CsrfToken};
use actix_csrf::CsrfMiddleware;
use actix_session::Session;
use actix_web::http::Method;
use actix_web::{web, HttpResponse, Responder};
use rand::rngs::StdRng;
use serde::Deserialize;
use tera::{Context, Tera};

pub const LOGIN_ERROR_KEY: &str = "login_error";
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password.";

/// Where a successful sign-in lands.
pub const AFTER_LOGIN_PATH: &str = "/create";

#[derive(Deserialize)]
struct LoginForm {
    csrf_token: CsrfToken,
    email: String,
    password: String,
}

impl CsrfGuarded for LoginForm {
    fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }
}

pub fn config_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(LOGIN_PATH)
            .route(web::get().to(show_login_form))
            .route(web::post().to(handle_login))
            .wrap(CsrfMiddleware::<StdRng>::new().set_cookie(Method::GET, LOGIN_PATH)),
    )
    .route("/logout", web::post().to(handle_logout));
}

async fn show_login_form(auth: AuthContext, session: Session, tera: web::Data<Tera>, token: CsrfToken) -> impl Responder {
    let mut ctx = Context::new();
    ctx.insert("current_user", &auth.current_user);
    ctx.insert("csrf_token", token.get());

    if let Ok(Some(error)) = session.get::<String>(LOGIN_ERROR_KEY) {
        ctx.insert("error", &error);
        session.remove(LOGIN_ERROR_KEY);
    }

    page_helpers::render(&tera, "login.html", &ctx)
}

fn reject_login(session: &Session) -> HttpResponse {
    if let Err(e) = session.insert(LOGIN_ERROR_KEY, INVALID_LOGIN_MESSAGE) {
        log::error!("Could not store login error in session: {}", e);
    }
    page_helpers::found(LOGIN_PATH)
}

async fn handle_login(session: Session, pool: web::Data<crate::DbPool>, form: Csrf<web::Form<LoginForm>>) -> impl Responder {
    let login_data = form.into_inner().into_inner();

    let conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Could not get accounts DB connection for login: {}", e);
            return reject_login(&session);
        }
    };

    let email = match users_db_operations::verify_credentials(&conn, &login_data.email, &login_data.password) {
        Some(email) => email,
        None => {
            log::warn!("Failed login attempt for '{}'", login_data.email.trim());
            return reject_login(&session);
        }
    };

    session.renew();
    if let Err(e) = session.insert(SESSION_USER_KEY, &email) {
        log::error!("Could not store signed-in user in session: {}", e);
        return reject_login(&session);
    }
    session.remove(LOGIN_ERROR_KEY);

    if let Err(e) = users_db_operations::update_last_login_time(&conn, &email) {
        log::warn!("Could not record last login time for {}: {}", email, e);
    }

    log::info!("Administrator {} signed in", email);
    page_helpers::found(AFTER_LOGIN_PATH)
}

async fn handle_logout(session: Session) -> impl Responder {
    session.purge();
    page_helpers::found("/")
}
