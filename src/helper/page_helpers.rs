use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use tera::{Context, Tera};

pub const ERROR_TEMPLATE: &str = "error.html";
pub const NOT_FOUND_TEMPLATE: &str = "not_found.html";

/// Renders a template with the given status. A template failure is logged and
/// answered with a bare 500 so a broken page never takes the error page down too.
pub fn render_with_status(tera: &Tera, template: &str, ctx: &Context, status: StatusCode) -> HttpResponse {
    match tera.render(template, ctx) {
        Ok(rendered) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(err) => {
            log::error!("Template rendering error for {}: {:?}", template, err);
            HttpResponse::InternalServerError().body("Error rendering page.")
        }
    }
}

pub fn render(tera: &Tera, template: &str, ctx: &Context) -> HttpResponse {
    render_with_status(tera, template, ctx, StatusCode::OK)
}

/// Error page shown when a page's data could not be loaded. `retry_path` is
/// the page the visitor was on, so "Try again" simply reloads it.
pub fn render_error_page(tera: &Tera, current_user: Option<&str>, retry_path: &str) -> HttpResponse {
    let mut ctx = Context::new();
    ctx.insert("current_user", &current_user);
    ctx.insert("retry_path", retry_path);
    ctx.insert("message", "Something went wrong while loading this page.");
    render_with_status(tera, ERROR_TEMPLATE, &ctx, StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn render_not_found(tera: &Tera, current_user: Option<&str>) -> HttpResponse {
    let mut ctx = Context::new();
    ctx.insert("current_user", &current_user);
    render_with_status(tera, NOT_FOUND_TEMPLATE, &ctx, StatusCode::NOT_FOUND)
}

/// Post/Redirect/Get target after a successful form submission.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther().append_header(("location", location)).finish()
}

pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found().append_header(("location", location)).finish()
}
