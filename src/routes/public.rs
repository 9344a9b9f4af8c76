use crate::config::Config;
use crate::helper::{page_helpers, public_helpers, sanitization_helpers, seo_helpers};
use crate::helper::validation_helpers::{extract_youtube_id, youtube_embed_url};
use crate::middleware::AuthContext;
use crate::models::db_operations::documents_db_operations::DbError;
use crate::models::{Article, Asset, Collection, CollectionRecord, StoredRecord, TeamMember};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use redb::Database;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

const EXCERPT_CHARS: usize = 180;

#[derive(Deserialize)]
pub struct BlogQuery {
    tag: Option<String>,
}

pub fn config_pages(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home_page))
        .route("/blogs", web::get().to(blogs_page))
        .route("/blogs/{id}", web::get().to(blog_detail_page))
        .route("/feature-story", web::get().to(feature_stories_page))
        .route("/feature-stories/{id}", web::get().to(feature_story_detail_page))
        .route("/gallery", web::get().to(gallery_page))
        .route("/documentaries", web::get().to(documentaries_page))
        .route("/research", web::get().to(research_page))
        .route("/team", web::get().to(team_page))
        .route("/about", web::get().to(about_page))
        .route("/contact", web::get().to(contact_page))
        .route("/robots.txt", web::get().to(robots_txt))
        .route("/sitemap.xml", web::get().to(sitemap_xml));
}

/// An article plus what the templates cannot compute themselves.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleView<'a> {
    #[serde(flatten)]
    stored: &'a StoredRecord<Article>,
    excerpt: String,
    body_html: Option<String>,
    video_embed_url: Option<String>,
}

impl<'a> ArticleView<'a> {
    fn summary(stored: &'a StoredRecord<Article>) -> Self {
        ArticleView {
            stored,
            excerpt: sanitization_helpers::excerpt(&stored.record.content, EXCERPT_CHARS),
            body_html: None,
            video_embed_url: None,
        }
    }

    fn full(stored: &'a StoredRecord<Article>) -> Self {
        let video_embed_url = match (&stored.record.video_url, stored.record.is_youtube_video) {
            (Some(url), true) => extract_youtube_id(url).map(|id| youtube_embed_url(&id)),
            _ => None,
        };
        ArticleView {
            body_html: Some(sanitization_helpers::render_markdown(&stored.record.content)),
            video_embed_url,
            ..Self::summary(stored)
        }
    }
}

fn base_context(auth: &AuthContext) -> Context {
    let mut ctx = Context::new();
    ctx.insert("current_user", &auth.current_user);
    ctx
}

fn load_failed(tera: &Tera, auth: &AuthContext, req: &HttpRequest, what: &str, e: DbError) -> HttpResponse {
    log::error!("Failed to load {}: {}", what, e);
    page_helpers::render_error_page(tera, auth.email(), req.path())
}

async fn home_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    let home = match public_helpers::fetch_home_page(&db) {
        Ok(home) => home,
        Err(e) => return load_failed(&tera, &auth, &req, "home page", e),
    };

    let mut ctx = base_context(&auth);
    ctx.insert("banner", &home.banner);
    ctx.insert("what_we_do", &home.what_we_do);
    ctx.insert("feature_story", &home.feature_story.as_ref().map(ArticleView::summary));
    let latest: Vec<ArticleView> = home.latest_blogs.iter().map(ArticleView::summary).collect();
    ctx.insert("latest_blogs", &latest);
    page_helpers::render(&tera, "home.html", &ctx)
}

async fn blogs_page(
    auth: AuthContext,
    req: HttpRequest,
    query: web::Query<BlogQuery>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
) -> impl Responder {
    let active_tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let (all_posts, posts) = match public_helpers::fetch_blogs(&db, None)
        .and_then(|all| public_helpers::fetch_blogs(&db, active_tag).map(|filtered| (all, filtered)))
    {
        Ok(pair) => pair,
        Err(e) => return load_failed(&tera, &auth, &req, "blogs", e),
    };

    let mut ctx = base_context(&auth);
    let views: Vec<ArticleView> = posts.iter().map(ArticleView::summary).collect();
    ctx.insert("posts", &views);
    ctx.insert("tags", &public_helpers::collect_tags(&all_posts));
    ctx.insert("active_tag", &active_tag);
    page_helpers::render(&tera, "blogs.html", &ctx)
}

async fn render_article(
    auth: AuthContext,
    req: HttpRequest,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    collection: Collection,
    id: &str,
    back_link: (&str, &str),
) -> HttpResponse {
    let article = match public_helpers::fetch_record::<Article>(&db, collection, id) {
        Ok(Some(article)) => article,
        Ok(None) => return page_helpers::render_not_found(&tera, auth.email()),
        Err(e) => return load_failed(&tera, &auth, &req, "article", e),
    };

    let mut ctx = base_context(&auth);
    ctx.insert("article", &ArticleView::full(&article));
    ctx.insert("back_path", back_link.0);
    ctx.insert("back_label", back_link.1);
    page_helpers::render(&tera, "article.html", &ctx)
}

async fn blog_detail_page(
    auth: AuthContext,
    req: HttpRequest,
    id: web::Path<String>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
) -> impl Responder {
    render_article(auth, req, tera, db, Collection::Blogs, &id, ("/blogs", "All blog posts")).await
}

async fn feature_story_detail_page(
    auth: AuthContext,
    req: HttpRequest,
    id: web::Path<String>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
) -> impl Responder {
    render_article(auth, req, tera, db, Collection::FeatureStories, &id, ("/feature-story", "Feature stories")).await
}

async fn feature_stories_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    let stories = match public_helpers::list_records::<Article>(&db, Collection::FeatureStories) {
        Ok(stories) => stories,
        Err(e) => return load_failed(&tera, &auth, &req, "feature stories", e),
    };

    let mut ctx = base_context(&auth);
    let views: Vec<ArticleView> = stories.iter().map(ArticleView::summary).collect();
    ctx.insert("stories", &views);
    page_helpers::render(&tera, "feature_story.html", &ctx)
}

/// Shared shape of the plain collection listings.
fn render_listing<T: CollectionRecord>(
    auth: &AuthContext,
    req: &HttpRequest,
    tera: &Tera,
    db: &Database,
    collection: Collection,
    template: &str,
) -> HttpResponse {
    match public_helpers::list_records::<T>(db, collection) {
        Ok(items) => {
            let mut ctx = base_context(auth);
            ctx.insert("items", &items);
            page_helpers::render(tera, template, &ctx)
        }
        Err(e) => load_failed(tera, auth, req, collection.name(), e),
    }
}

async fn gallery_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    render_listing::<Asset>(&auth, &req, &tera, &db, Collection::Photos, "gallery.html")
}

async fn documentaries_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    render_listing::<Asset>(&auth, &req, &tera, &db, Collection::Videos, "documentaries.html")
}

async fn research_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    render_listing::<Asset>(&auth, &req, &tera, &db, Collection::Pdfs, "research.html")
}

async fn team_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    render_listing::<TeamMember>(&auth, &req, &tera, &db, Collection::TeamMembers, "team.html")
}

async fn about_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    match public_helpers::fetch_what_we_do(&db) {
        Ok(what_we_do) => {
            let mut ctx = base_context(&auth);
            ctx.insert("what_we_do", &what_we_do);
            page_helpers::render(&tera, "about.html", &ctx)
        }
        Err(e) => load_failed(&tera, &auth, &req, "what we do", e),
    }
}

async fn contact_page(auth: AuthContext, req: HttpRequest, tera: web::Data<Tera>, db: web::Data<Database>) -> impl Responder {
    match public_helpers::fetch_latest_contact(&db) {
        Ok(contact) => {
            let mut ctx = base_context(&auth);
            ctx.insert("contact", &contact);
            page_helpers::render(&tera, "contact.html", &ctx)
        }
        Err(e) => load_failed(&tera, &auth, &req, "contact info", e),
    }
}

async fn robots_txt(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(seo_helpers::robots_txt(&config.site_url))
}

async fn sitemap_xml(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(seo_helpers::sitemap_xml(&config.site_url))
}

/// Fallback for every path no route matched.
pub async fn not_found_page(auth: AuthContext, tera: web::Data<Tera>) -> impl Responder {
    page_helpers::render_not_found(&tera, auth.email())
}
