pub mod api;
pub mod auth;
pub mod create;
pub mod edit;
pub mod public;

use actix_web::web;

/// Every route the site serves, plus the 404 fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(api::config_api)
        .configure(auth::config_auth)
        .configure(create::config_create)
        .configure(edit::config_edit)
        .configure(public::config_pages)
        .default_service(web::to(public::not_found_page));
}
