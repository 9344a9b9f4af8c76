use crate::config::Config;
use crate::helper::content_helpers::{self, ContentError, SaveContext};
use crate::helper::existence_helpers;
use crate::helper::form_helpers::{self, FormError};
use crate::helper::page_helpers;
use crate::middleware::AuthenticatedAdmin;
use crate::models::ContentKind;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use redb::Database;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

pub fn config_create(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::get().to(show_create_dashboard))
        .route("/create/{kind}", web::get().to(show_create_form))
        .route("/create/{kind}", web::post().to(handle_create));
}

#[derive(Serialize)]
struct KindOption {
    slug: &'static str,
    label: &'static str,
    disabled: bool,
}

/// Everything a `forms/*.html` template reads.
pub(super) struct FormPage<'a> {
    pub kind: ContentKind,
    pub action: String,
    pub is_edit: bool,
    pub id: Option<&'a str>,
    pub values: &'a HashMap<String, String>,
    pub errors: &'a [String],
}

pub(super) fn render_form(tera: &Tera, admin: &AuthenticatedAdmin, page: FormPage<'_>, status: StatusCode) -> HttpResponse {
    let mut ctx = Context::new();
    ctx.insert("current_user", &Some(&admin.email));
    ctx.insert("kind", page.kind.as_str());
    ctx.insert("kind_label", page.kind.label());
    ctx.insert("action", &page.action);
    ctx.insert("is_edit", &page.is_edit);
    ctx.insert("id", &page.id);
    ctx.insert("values", page.values);
    ctx.insert("errors", page.errors);
    ctx.insert("listing_path", page.kind.listing_path());
    page_helpers::render_with_status(tera, &page.kind.form_template(), &ctx, status)
}

/// Status and messages for a failed save. Backend failures are logged here
/// and replaced with the generic message.
pub(super) fn save_failure(kind: ContentKind, e: &ContentError) -> (StatusCode, Vec<String>) {
    match e {
        ContentError::Validation(messages) => (StatusCode::UNPROCESSABLE_ENTITY, messages.clone()),
        ContentError::AlreadyExists(_) => (StatusCode::CONFLICT, vec![e.to_string()]),
        ContentError::NotFound => (StatusCode::NOT_FOUND, vec![e.to_string()]),
        _ => {
            log::error!("Saving {} failed: {}", kind.label(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, vec![e.user_message()])
        }
    }
}

pub(super) fn form_read_failure(e: &FormError) -> (StatusCode, Vec<String>) {
    log::warn!("Rejected form submission: {}", e);
    let status = match e {
        FormError::FileTooLarge(_) | FormError::FieldTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, vec![e.to_string()])
}

pub(super) fn parse_kind(slug: &str) -> Option<ContentKind> {
    slug.parse::<ContentKind>().ok()
}

async fn show_create_dashboard(admin: AuthenticatedAdmin, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    let existing = existence_helpers::check_content_existence(&db);
    let options: Vec<KindOption> = ContentKind::ALL
        .iter()
        .map(|kind| KindOption {
            slug: kind.as_str(),
            label: kind.label(),
            disabled: kind.is_singleton() && existence_helpers::exists(&existing, *kind),
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("current_user", &Some(&admin.email));
    ctx.insert("kinds", &options);
    page_helpers::render(&tera, "create.html", &ctx)
}

async fn show_create_form(
    admin: AuthenticatedAdmin,
    kind: web::Path<String>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
) -> impl Responder {
    let kind = match parse_kind(&kind) {
        Some(kind) => kind,
        None => return page_helpers::render_not_found(&tera, Some(&admin.email)),
    };

    let mut errors = Vec::new();
    if kind.is_singleton() {
        let existing = existence_helpers::check_content_existence(&db);
        if existence_helpers::exists(&existing, kind) {
            errors.push(ContentError::AlreadyExists(kind.label()).to_string());
        }
    }

    let values = HashMap::new();
    let page = FormPage {
        kind,
        action: format!("/create/{}", kind.as_str()),
        is_edit: false,
        id: None,
        values: &values,
        errors: &errors,
    };
    render_form(&tera, &admin, page, StatusCode::OK)
}

async fn handle_create(
    admin: AuthenticatedAdmin,
    kind: web::Path<String>,
    payload: Multipart,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> impl Responder {
    let kind = match parse_kind(&kind) {
        Some(kind) => kind,
        None => return page_helpers::render_not_found(&tera, Some(&admin.email)),
    };
    let action = format!("/create/{}", kind.as_str());

    let form = match form_helpers::collect_multipart(payload, config.max_upload_size_bytes()).await {
        Ok(form) => form,
        Err(e) => {
            let (status, errors) = form_read_failure(&e);
            let values = HashMap::new();
            let page = FormPage { kind, action, is_edit: false, id: None, values: &values, errors: &errors };
            return render_form(&tera, &admin, page, status);
        }
    };

    // Kept for re-rendering; the file itself is never echoed back.
    let values = form.fields.clone();
    let ctx = SaveContext { db: &db, media_root: config.media_root() };

    match content_helpers::create_content(&ctx, kind, form).await {
        Ok(id) => {
            log::info!("{} created {} {}", admin.email, kind, id);
            page_helpers::see_other(kind.listing_path())
        }
        Err(e) => {
            let (status, errors) = save_failure(kind, &e);
            let page = FormPage { kind, action, is_edit: false, id: None, values: &values, errors: &errors };
            render_form(&tera, &admin, page, status)
        }
    }
}
