use crate::helper::{existence_helpers, public_helpers};
use actix_web::{web, HttpResponse, Responder};
use redb::Database;

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/is_server_active", web::get().to(is_server_active))
            .route("/content/exists", web::get().to(content_exists))
            .route("/contact", web::get().to(latest_contact)),
    );
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

/// `{"Feature Story": bool, "What We Do": bool, "Banner": bool}`, or `{}`
/// when the store could not be read.
async fn content_exists(db: web::Data<Database>) -> impl Responder {
    HttpResponse::Ok().json(existence_helpers::check_content_existence(&db))
}

async fn latest_contact(db: web::Data<Database>) -> impl Responder {
    match public_helpers::fetch_latest_contact(&db) {
        Ok(Some(contact)) => HttpResponse::Ok().json(contact),
        Ok(None) => HttpResponse::NotFound().body("Contact info not found"),
        Err(e) => {
            log::error!("Failed to fetch contact info: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
