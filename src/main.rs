use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware::{Logger, DefaultHeaders}, cookie::Key};
use tera::Tera;
use endfgm_site::{
    config::Config,
    routes,
    middleware::RouteGate,
    models::db_operations::documents_db_operations,
    session_middleware,
};
use r2d2_sqlite::SqliteConnectionManager;
use r2d2::Pool;
use std::fs;
use clap::Parser;
use std::path::PathBuf;
use std::convert::TryFrom;

#[derive(Parser, Debug)]
#[command(name = "endfgm_server", author, version, about = "Starts the Travel to End FGM website.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let methods = vec!["GET", "POST"];
    let headers = vec![actix_web::http::header::ACCEPT, actix_web::http::header::CONTENT_TYPE];

    if allowed_origins.trim() == "*" {
        return Cors::default()
            .allow_any_origin()
            .allowed_methods(methods)
            .allowed_headers(headers)
            .max_age(3600);
    }

    let mut cors = Cors::default();
    for origin in allowed_origins.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
        cors = cors.allowed_origin(origin);
    }
    cors.allowed_methods(methods)
        .allowed_headers(headers)
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = Tera::new("templates/**/*.html").expect("FATAL: Tera initialization failed");

    fs::create_dir_all(&config.media_path)
        .expect("FATAL: Failed to create media directory");

    let documents_db = web::Data::new(documents_db_operations::open_documents_db(&config.documents_db_path())
        .expect("FATAL: documents.db could not be opened. Run 'cargo run --bin setup_cli -- --env-file <path> db setup'"));

    let manager = SqliteConnectionManager::file(config.accounts_db_path());
    let pool = Pool::builder()
        .build(manager)
        .expect("FATAL: Failed to create Rusqlite connection pool.");

    let session_key_bytes = hex::decode(&config.session_secret_key)
        .expect("FATAL: SESSION_SECRET_KEY in .env is not a valid hex string.");
    let session_key = Key::try_from(session_key_bytes.as_slice())
        .expect("FATAL: The decoded SESSION_SECRET_KEY is not long enough (minimum 64 bytes required).");

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(RouteGate)
            .wrap(session_middleware(session_key.clone(), config.use_secure_cookies))
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(documents_db.clone())
            .app_data(web::Data::new(pool.clone()))
            .service(actix_files::Files::new("/media", &config.media_path))
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
