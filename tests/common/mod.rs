#![allow(dead_code)]

use endfgm_site::config::{Config, WebConfig};
use endfgm_site::models::db_operations::{documents_db_operations, users_db_operations};
use endfgm_site::setup::db_setup;
use endfgm_site::DbPool;
use actix_web::web;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use redb::Database;
use rusqlite::Connection;
use tempfile::TempDir;
use tera::Tera;

pub const ADMIN_EMAIL: &str = "admin@traveltoendfgm.org";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const SITE_URL: &str = "https://traveltoendfgm.test";
pub const BOUNDARY: &str = "----endfgm-test-boundary";

/// Throwaway databases, media folder and templates for one test.
pub struct TestSite {
    pub dir: TempDir,
    pub config: Config,
    pub db: web::Data<Database>,
    pub pool: DbPool,
    pub tera: Tera,
}

impl TestSite {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// A site whose document tables were never created, so every read fails.
    pub fn with_broken_store() -> Self {
        Self::build(false)
    }

    fn build(create_tables: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            web: WebConfig { host: "127.0.0.1".to_string(), port: 0 },
            database_path: dir.path().join("data").to_string_lossy().into_owned(),
            media_path: dir.path().join("media").to_string_lossy().into_owned(),
            site_url: SITE_URL.to_string(),
            allowed_origins: String::new(),
            log_level: "info".to_string(),
            session_secret_key: "07".repeat(64),
            use_secure_cookies: false,
            max_upload_size_mb: 1,
        };

        let documents_path = config.documents_db_path();
        std::fs::create_dir_all(documents_path.parent().unwrap()).unwrap();
        let db = documents_db_operations::open_documents_db(&documents_path).unwrap();
        if create_tables {
            db_setup::setup_documents_db(&db).unwrap();
        }

        let accounts_path = config.accounts_db_path();
        std::fs::create_dir_all(accounts_path.parent().unwrap()).unwrap();
        let mut conn = Connection::open(&accounts_path).unwrap();
        db_setup::setup_accounts_db(&mut conn).unwrap();
        users_db_operations::create_admin(&conn, ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();

        let pool = Pool::builder().max_size(2).build(SqliteConnectionManager::file(&accounts_path)).unwrap();
        let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")).unwrap();

        TestSite { dir, config, db: web::Data::new(db), pool, tera }
    }
}

/// Pulls the hidden CSRF token out of the rendered login form.
pub fn extract_csrf_token(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("login form has a csrf_token field") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html_escape::decode_html_entities(&html[start..end]).into_owned()
}

/// Builds a multipart/form-data body with `BOUNDARY`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n", file_name).as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// The full application stack the server runs, minus CORS and access logs.
#[macro_export]
macro_rules! test_app {
    ($site:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(endfgm_site::middleware::RouteGate)
                .wrap(endfgm_site::session_middleware(
                    actix_web::cookie::Key::from(&hex::decode(&$site.config.session_secret_key).unwrap()),
                    false,
                ))
                .app_data(actix_web::web::Data::new($site.config.clone()))
                .app_data(actix_web::web::Data::new($site.tera.clone()))
                .app_data($site.db.clone())
                .app_data(actix_web::web::Data::new($site.pool.clone()))
                .service(actix_files::Files::new("/media", &$site.config.media_path))
                .configure(endfgm_site::routes::configure),
        )
        .await
    };
}

/// Signs in through the real login form and returns the session cookie.
#[macro_export]
macro_rules! sign_in {
    ($app:expr) => {{
        let login_page = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri("/login").to_request(),
        )
        .await;
        assert_eq!(login_page.status(), actix_web::http::StatusCode::OK);
        let csrf_cookies: Vec<actix_web::cookie::Cookie<'static>> =
            login_page.response().cookies().map(|c| c.into_owned()).collect();
        let body = actix_web::test::read_body(login_page).await;
        let token = common::extract_csrf_token(std::str::from_utf8(&body).unwrap());

        let mut req = actix_web::test::TestRequest::post().uri("/login").set_form([
            ("csrf_token", token.as_str()),
            ("email", common::ADMIN_EMAIL),
            ("password", common::ADMIN_PASSWORD),
        ]);
        for cookie in &csrf_cookies {
            req = req.cookie(cookie.clone());
        }
        let res = actix_web::test::call_service(&$app, req.to_request()).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(res.headers().get("location").unwrap(), "/create");
        res.response()
            .cookies()
            .find(|c| c.name() == endfgm_site::SESSION_COOKIE_NAME)
            .expect("login sets the session cookie")
            .into_owned()
    }};
}
