#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::TestSite;
use endfgm_site::models::db_operations::documents_db_operations;
use endfgm_site::models::Collection;

fn multipart_post(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("content-type", common::multipart_content_type()))
        .set_payload(common::multipart_body(fields, file))
}

async fn body_text<B: actix_web::body::MessageBody>(res: actix_web::dev::ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

const CONTACT_FIELDS: [(&str, &str); 3] = [
    ("email", "info@traveltoendfgm.org"),
    ("phone", "+44 20 7946 0958"),
    ("location", "London, United Kingdom"),
];

#[actix_web::test]
async fn invalid_blog_is_redisplayed_with_messages_and_not_saved() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let req = multipart_post("/create/blog", &[("title", "Hey"), ("content", "Too short")], None)
        .cookie(session)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(res).await;
    assert!(html.contains("Title must be at least 5 characters."));
    assert!(html.contains("Content must be at least 20 characters."));
    // Entered values survive the round trip.
    assert!(html.contains("Hey"));
    assert!(documents_db_operations::list_documents(&site.db, Collection::Blogs).unwrap().is_empty());
}

#[actix_web::test]
async fn created_blog_appears_on_the_listing_and_its_own_page() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let req = multipart_post(
        "/create/blog",
        &[
            ("title", "Walking the last mile"),
            ("content", "Community health workers carried the message village by village."),
            ("tags", "advocacy, health"),
        ],
        None,
    )
    .cookie(session)
    .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/blogs");

    let res = test::call_service(&app, TestRequest::get().uri("/blogs").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("Walking the last mile"));

    let stored = documents_db_operations::list_documents(&site.db, Collection::Blogs).unwrap();
    assert_eq!(stored.len(), 1);
    let uri = format!("/blogs/{}", stored[0].0);
    let res = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("village by village"));

    let res = test::call_service(&app, TestRequest::get().uri("/blogs?tag=Health").to_request()).await;
    assert!(body_text(res).await.contains("Walking the last mile"));
}

#[actix_web::test]
async fn uploaded_photo_is_served_from_the_media_folder() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let req = multipart_post(
        "/create/photo",
        &[("title", "Dawn march"), ("description", "Survivors leading the march")],
        Some(("march.png", "image/png", b"\x89PNG fake image bytes")),
    )
    .cookie(session)
    .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/gallery");

    let stored = documents_db_operations::list_documents(&site.db, Collection::Photos).unwrap();
    assert_eq!(stored.len(), 1);
    let json: serde_json::Value = serde_json::from_str(&stored[0].1).unwrap();
    let url = json["fileUrl"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/photos/"), "{}", url);

    let res = test::call_service(&app, TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, &b"\x89PNG fake image bytes"[..]);
}

#[actix_web::test]
async fn singleton_is_disabled_on_the_dashboard_once_it_exists() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let banner = [
        ("title", "End FGM now"),
        ("description", "A generation that says no to cutting."),
        ("mediaType", "youtube"),
        ("mediaUrl", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
    ];
    let res = test::call_service(&app, multipart_post("/create/banner", &banner, None).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = test::call_service(&app, TestRequest::get().uri("/create").cookie(session.clone()).to_request()).await;
    let html = body_text(res).await;
    assert!(html.contains("Banner"));
    assert!(html.contains(r#"aria-disabled="true""#));

    let res = test::call_service(&app, multipart_post("/create/banner", &banner, None).cookie(session).to_request()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(documents_db_operations::list_documents(&site.db, Collection::Banners).unwrap().len(), 1);

    let res = test::call_service(&app, TestRequest::get().uri("/api/content/exists").to_request()).await;
    let exists: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(exists["Banner"], true);
    assert_eq!(exists["Feature Story"], false);
}

#[actix_web::test]
async fn existence_check_starts_empty() {
    let site = TestSite::new();
    let app = test_app!(site);

    let res = test::call_service(&app, TestRequest::get().uri("/api/content/exists").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let exists: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(exists, serde_json::json!({"Feature Story": false, "What We Do": false, "Banner": false}));
}

#[actix_web::test]
async fn contact_edit_is_shown_on_the_contact_page() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let res = test::call_service(&app, TestRequest::get().uri("/api/contact").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(res).await, "Contact info not found");

    let res = test::call_service(&app, multipart_post("/create/contact", &CONTACT_FIELDS, None).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/contact");

    let id = documents_db_operations::list_documents(&site.db, Collection::SiteContactInfo).unwrap()[0].0.clone();
    let edit_uri = format!("/edit/contact/{}", id);
    let res = test::call_service(&app, TestRequest::get().uri(&edit_uri).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("info@traveltoendfgm.org"));

    let updated = [
        ("email", "hello@traveltoendfgm.org"),
        ("phone", "+44 20 7946 0958"),
        ("location", "London, United Kingdom"),
    ];
    let res = test::call_service(&app, multipart_post(&edit_uri, &updated, None).cookie(session).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/contact");

    let res = test::call_service(&app, TestRequest::get().uri("/contact").to_request()).await;
    let html = body_text(res).await;
    assert!(html.contains("hello@traveltoendfgm.org"));
    assert!(!html.contains("info@traveltoendfgm.org"));

    let res = test::call_service(&app, TestRequest::get().uri("/api/contact").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let contact: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(contact["email"], "hello@traveltoendfgm.org");
}

#[actix_web::test]
async fn editing_a_missing_document_is_not_found() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let uri = "/edit/contact/0f7c1f52-3c7e-4a8e-9d8f-1b2c3d4e5f60";
    let res = test::call_service(&app, TestRequest::get().uri(uri).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(&app, multipart_post(uri, &CONTACT_FIELDS, None).cookie(session).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(documents_db_operations::list_documents(&site.db, Collection::SiteContactInfo).unwrap().is_empty());
}

#[actix_web::test]
async fn deleting_a_document_removes_it_from_the_site() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let member = [
        ("name", "Amina Yusuf"),
        ("role", "Programme lead"),
        ("bio", "Amina has worked with survivor networks for a decade."),
    ];
    let res = test::call_service(&app, multipart_post("/create/team-member", &member, None).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = test::call_service(&app, TestRequest::get().uri("/edit").cookie(session.clone()).to_request()).await;
    assert!(body_text(res).await.contains("Amina Yusuf"));

    let id = documents_db_operations::list_documents(&site.db, Collection::TeamMembers).unwrap()[0].0.clone();
    let delete_uri = format!("/edit/team-member/{}/delete", id);
    let res = test::call_service(&app, TestRequest::post().uri(&delete_uri).cookie(session).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get("location").unwrap(), "/edit");

    let res = test::call_service(&app, TestRequest::get().uri("/team").to_request()).await;
    assert!(!body_text(res).await.contains("Amina Yusuf"));
}

#[actix_web::test]
async fn what_we_do_is_created_then_edited_in_place() {
    let site = TestSite::new();
    let app = test_app!(site);
    let session = sign_in!(app);

    let res = test::call_service(&app, TestRequest::get().uri("/edit/what-we-do").cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get("location").unwrap(), "/create/what-we-do");

    let fields = [
        ("mission", "Ending female genital mutilation within a generation."),
        ("approach", "Working alongside community and faith leaders."),
        ("impact", "Thousands of girls protected across three regions."),
    ];
    let res = test::call_service(&app, multipart_post("/create/what-we-do", &fields, None).cookie(session.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let edited = [
        ("mission", "Ending female genital mutilation within this generation."),
        ("approach", "Working alongside community and faith leaders."),
        ("impact", "Thousands of girls protected across four regions."),
    ];
    let res = test::call_service(&app, multipart_post("/edit/what-we-do", &edited, None).cookie(session).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = test::call_service(&app, TestRequest::get().uri("/about").to_request()).await;
    assert!(body_text(res).await.contains("four regions"));
}
