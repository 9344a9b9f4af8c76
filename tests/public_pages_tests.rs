#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::TestSite;

macro_rules! get_text {
    ($app:expr, $uri:expr) => {{
        let res = test::call_service(&$app, TestRequest::get().uri($uri).to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }};
}

#[actix_web::test]
async fn sitemap_and_robots_use_the_site_url() {
    let site = TestSite::new();
    let app = test_app!(site);

    let (status, sitemap) = get_text!(app, "/sitemap.xml");
    assert_eq!(status, StatusCode::OK);
    assert!(sitemap.contains("<loc>https://traveltoendfgm.test/documentaries</loc>"));
    assert!(!sitemap.contains("/login"));

    let (status, robots) = get_text!(app, "/robots.txt");
    assert_eq!(status, StatusCode::OK);
    assert!(robots.contains("Disallow: /create"));
    assert!(robots.contains("Sitemap: https://traveltoendfgm.test/sitemap.xml"));
}

#[actix_web::test]
async fn unknown_content_is_not_found() {
    let site = TestSite::new();
    let app = test_app!(site);

    let (status, _) = get_text!(app, "/blogs/0f7c1f52-3c7e-4a8e-9d8f-1b2c3d4e5f60");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_text!(app, "/blogs/not-an-id");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_text!(app, "/feature-stories/missing");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_text!(app, "/no-such-page");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn empty_site_renders_placeholders() {
    let site = TestSite::new();
    let app = test_app!(site);

    let (status, html) = get_text!(app, "/blogs");
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No blog posts yet."));

    let (status, html) = get_text!(app, "/contact");
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Contact details are not available yet."));
}

#[actix_web::test]
async fn unreadable_store_shows_the_error_page_with_a_retry_link() {
    let site = TestSite::with_broken_store();
    let app = test_app!(site);

    for path in ["/gallery", "/blogs", "/team"] {
        let (status, html) = get_text!(app, path);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
        assert!(html.contains("Try again"), "{}", path);
    }

    // The existence check degrades to an empty object rather than failing.
    let res = test::call_service(&app, TestRequest::get().uri("/api/content/exists").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let exists: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(exists, serde_json::json!({}));
}

#[actix_web::test]
async fn missing_media_is_not_found_without_a_session() {
    let site = TestSite::new();
    let app = test_app!(site);

    let (status, _) = get_text!(app, "/media/photos/does-not-exist.png");
    assert_eq!(status, StatusCode::NOT_FOUND);
}
