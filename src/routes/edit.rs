use crate::config::Config;
use crate::helper::content_helpers::{self, SaveContext};
use crate::helper::form_helpers;
use crate::helper::page_helpers;
use crate::middleware::AuthenticatedAdmin;
use crate::models::ContentKind;
use crate::routes::create::{form_read_failure, parse_kind, render_form, save_failure, FormPage};
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use redb::Database;
use std::collections::HashMap;
use tera::{Context, Tera};

const WHAT_WE_DO_EDIT_PATH: &str = "/edit/what-we-do";

pub fn config_edit(cfg: &mut web::ServiceConfig) {
    cfg.route("/edit", web::get().to(show_edit_index))
        .route("/edit/what-we-do", web::get().to(show_what_we_do_form))
        .route("/edit/what-we-do", web::post().to(handle_what_we_do_edit))
        .route("/edit/{kind}/{id}", web::get().to(show_edit_form))
        .route("/edit/{kind}/{id}", web::post().to(handle_edit))
        .route("/edit/{kind}/{id}/delete", web::post().to(handle_delete));
}

fn edit_action(kind: ContentKind, id: &str) -> String {
    match kind {
        ContentKind::WhatWeDo => WHAT_WE_DO_EDIT_PATH.to_string(),
        _ => format!("/edit/{}/{}", kind.as_str(), id),
    }
}

async fn show_edit_index(admin: AuthenticatedAdmin, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    match content_helpers::list_edit_sections(&db) {
        Ok(sections) => {
            let mut ctx = Context::new();
            ctx.insert("current_user", &Some(&admin.email));
            ctx.insert("sections", &sections);
            page_helpers::render(&tera, "edit.html", &ctx)
        }
        Err(e) => {
            log::error!("Failed to load edit index: {}", e);
            page_helpers::render_error_page(&tera, Some(&admin.email), req.path())
        }
    }
}

fn render_stored_form(
    admin: &AuthenticatedAdmin,
    req: &HttpRequest,
    tera: &Tera,
    db: &Database,
    kind: ContentKind,
    id: &str,
) -> HttpResponse {
    match content_helpers::load_form_values(db, kind, id) {
        Ok(Some(values)) => {
            let page = FormPage {
                kind,
                action: edit_action(kind, id),
                is_edit: true,
                id: Some(id),
                values: &values,
                errors: &[],
            };
            render_form(tera, admin, page, StatusCode::OK)
        }
        Ok(None) if kind == ContentKind::WhatWeDo => page_helpers::found("/create/what-we-do"),
        Ok(None) => page_helpers::render_not_found(tera, Some(&admin.email)),
        Err(e) => {
            log::error!("Failed to load {} {} for editing: {}", kind.label(), id, e);
            page_helpers::render_error_page(tera, Some(&admin.email), req.path())
        }
    }
}

async fn show_edit_form(
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    match parse_kind(&kind) {
        Some(kind) => render_stored_form(&admin, &req, &tera, &db, kind, &id),
        None => page_helpers::render_not_found(&tera, Some(&admin.email)),
    }
}

async fn show_what_we_do_form(admin: AuthenticatedAdmin, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    render_stored_form(&admin, &req, &tera, &db, ContentKind::WhatWeDo, "")
}

async fn apply_edit(
    admin: AuthenticatedAdmin,
    kind: ContentKind,
    id: &str,
    payload: Multipart,
    tera: &Tera,
    db: &Database,
    config: &Config,
) -> HttpResponse {
    let action = edit_action(kind, id);

    let form = match form_helpers::collect_multipart(payload, config.max_upload_size_bytes()).await {
        Ok(form) => form,
        Err(e) => {
            let (status, errors) = form_read_failure(&e);
            let values = HashMap::new();
            let page = FormPage { kind, action, is_edit: true, id: Some(id), values: &values, errors: &errors };
            return render_form(tera, &admin, page, status);
        }
    };

    let values = form.fields.clone();
    let ctx = SaveContext { db, media_root: config.media_root() };

    match content_helpers::update_content(&ctx, kind, id, form).await {
        Ok(()) => {
            log::info!("{} edited {} {}", admin.email, kind, id);
            page_helpers::see_other(kind.listing_path())
        }
        Err(e) => {
            let (status, errors) = save_failure(kind, &e);
            let page = FormPage { kind, action, is_edit: true, id: Some(id), values: &values, errors: &errors };
            render_form(tera, &admin, page, status)
        }
    }
}

async fn handle_edit(
    admin: AuthenticatedAdmin,
    path: web::Path<(String, String)>,
    payload: Multipart,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    match parse_kind(&kind) {
        Some(kind) => apply_edit(admin, kind, &id, payload, &tera, &db, &config).await,
        None => page_helpers::render_not_found(&tera, Some(&admin.email)),
    }
}

async fn handle_what_we_do_edit(
    admin: AuthenticatedAdmin,
    payload: Multipart,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> impl Responder {
    apply_edit(admin, ContentKind::WhatWeDo, "", payload, &tera, &db, &config).await
}

async fn handle_delete(
    admin: AuthenticatedAdmin,
    path: web::Path<(String, String)>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    let kind = match parse_kind(&kind).filter(|kind| kind.collection().is_some()) {
        Some(kind) => kind,
        None => return page_helpers::render_not_found(&tera, Some(&admin.email)),
    };

    let ctx = SaveContext { db: &db, media_root: config.media_root() };
    match content_helpers::delete_content(&ctx, kind, &id).await {
        Ok(()) => {
            log::info!("{} deleted {} {}", admin.email, kind, id);
            page_helpers::see_other("/edit")
        }
        Err(content_helpers::ContentError::NotFound) => page_helpers::render_not_found(&tera, Some(&admin.email)),
        Err(e) => {
            log::error!("Failed to delete {} {}: {}", kind.label(), id, e);
            page_helpers::render_error_page(&tera, Some(&admin.email), "/edit")
        }
    }
}
