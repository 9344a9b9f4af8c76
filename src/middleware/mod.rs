use actix_web::{
    body::EitherBody,
    dev::{self, forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpRequest, HttpResponse,
};
use actix_session::{Session, SessionExt};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use serde::Serialize;
use std::future::{ready, Ready as StdReady};

/// Session key holding the signed-in administrator's email.
pub const SESSION_USER_KEY: &str = "user_email";

pub const LOGIN_PATH: &str = "/login";

const PROTECTED_ROOTS: [&str; 2] = ["/create", "/edit"];
const PASSTHROUGH_PREFIXES: [&str; 3] = ["/media/", "/static/", "/api/"];
const PASSTHROUGH_FILES: [&str; 3] = ["/favicon.ico", "/robots.txt", "/sitemap.xml"];

pub fn session_user(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_USER_KEY).unwrap_or_else(|e| {
        log::warn!("Unreadable session value, treating request as signed out: {}", e);
        None
    })
}

/// Who is signed in, if anyone. Never rejects a request.
#[derive(Serialize, Debug, Clone, Default)]
pub struct AuthContext {
    pub current_user: Option<String>,
}

impl AuthContext {
    pub fn email(&self) -> Option<&str> {
        self.current_user.as_deref()
    }
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = StdReady<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(Ok(AuthContext { current_user: session_user(&req.get_session()) }))
    }
}

/// A signed-in administrator. Handlers taking this answer 401 without a session.
#[derive(Serialize, Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub email: String,
}

impl FromRequest for AuthenticatedAdmin {
    type Error = actix_web::Error;
    type Future = StdReady<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        match session_user(&req.get_session()) {
            Some(email) => ready(Ok(AuthenticatedAdmin { email })),
            None => ready(Err(actix_web::error::ErrorUnauthorized("Not logged in."))),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    Redirect(&'static str),
}

fn is_static_asset(path: &str) -> bool {
    PASSTHROUGH_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || PASSTHROUGH_FILES.contains(&path)
        || path.rsplit('/').next().map_or(false, |segment| segment.contains('.'))
}

fn is_protected(path: &str) -> bool {
    PROTECTED_ROOTS.iter().any(|root| {
        path == *root || path.strip_prefix(root).map_or(false, |rest| rest.starts_with('/'))
    })
}

/// Decides whether a request may proceed based only on its path and whether
/// a session exists.
pub fn gate_decision(path: &str, has_session: bool) -> GateDecision {
    if !has_session && is_protected(path) {
        return GateDecision::Redirect(LOGIN_PATH);
    }
    if is_static_asset(path) {
        return GateDecision::Continue;
    }
    if has_session && path == LOGIN_PATH {
        return GateDecision::Redirect("/");
    }
    GateDecision::Continue
}

/// Redirects signed-out visitors away from the admin pages, and signed-in
/// ones away from the login page.
pub struct RouteGate;

impl<S, B> Transform<S, ServiceRequest> for RouteGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RouteGateMiddleware { service })
    }
}

pub struct RouteGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RouteGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let has_session = session_user(&req.get_session()).is_some();

        match gate_decision(req.path(), has_session) {
            GateDecision::Continue => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            GateDecision::Redirect(location) => {
                log::debug!("Route gate redirecting {} to {}", req.path(), location);
                Box::pin(async move {
                    let (http_req, _payload) = req.into_parts();
                    let res = HttpResponse::Found()
                        .append_header(("location", location))
                        .finish()
                        .map_into_right_body();
                    Ok(ServiceResponse::new(http_req, res))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_visitors_are_sent_to_login() {
        for path in ["/create", "/create/blog", "/edit", "/edit/blog/123", "/edit/what-we-do"] {
            assert_eq!(gate_decision(path, false), GateDecision::Redirect("/login"), "{}", path);
        }
    }

    #[test]
    fn dotted_admin_paths_are_still_protected() {
        for path in ["/create/foo.bar", "/edit/blog/report.pdf"] {
            assert_eq!(gate_decision(path, false), GateDecision::Redirect("/login"), "{}", path);
            assert_eq!(gate_decision(path, true), GateDecision::Continue, "{}", path);
        }
    }

    #[test]
    fn lookalike_paths_are_not_protected() {
        assert_eq!(gate_decision("/created", false), GateDecision::Continue);
        assert_eq!(gate_decision("/editorial", false), GateDecision::Continue);
    }

    #[test]
    fn signed_in_users_skip_the_login_page() {
        assert_eq!(gate_decision("/login", true), GateDecision::Redirect("/"));
        assert_eq!(gate_decision("/login", false), GateDecision::Continue);
        assert_eq!(gate_decision("/edit/blog/1", true), GateDecision::Continue);
    }

    #[test]
    fn assets_and_api_are_never_gated() {
        for path in [
            "/api/content/exists",
            "/media/pdfs/a.pdf",
            "/static/site.css",
            "/favicon.ico",
            "/robots.txt",
            "/sitemap.xml",
            "/blogs/cover.png",
        ] {
            assert_eq!(gate_decision(path, false), GateDecision::Continue, "{}", path);
            assert_eq!(gate_decision(path, true), GateDecision::Continue, "{}", path);
        }
    }

    #[test]
    fn public_pages_pass_either_way() {
        for path in ["/", "/blogs", "/blogs/abc", "/team", "/contact"] {
            assert_eq!(gate_decision(path, false), GateDecision::Continue);
            assert_eq!(gate_decision(path, true), GateDecision::Continue);
        }
    }
}
