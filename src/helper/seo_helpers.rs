/// Public pages listed in the sitemap, in navigation order.
pub const PUBLIC_ROUTES: [&str; 9] = [
    "/",
    "/blogs",
    "/feature-story",
    "/gallery",
    "/documentaries",
    "/research",
    "/team",
    "/about",
    "/contact",
];

const DISALLOWED: [&str; 4] = ["/create", "/edit", "/login", "/api/"];

fn base_url(site_url: &str) -> &str {
    site_url.trim_end_matches('/')
}

pub fn robots_txt(site_url: &str) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED {
        body.push_str(&format!("Disallow: {}\n", path));
    }
    body.push_str(&format!("\nSitemap: {}/sitemap.xml\n", base_url(site_url)));
    body
}

/// Sitemap of the fixed public pages.
pub fn sitemap_xml(site_url: &str) -> String {
    let base = base_url(site_url);
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for path in PUBLIC_ROUTES {
        let loc = format!("{}{}", base, path);
        let priority = if path == "/" { "1.0" } else { "0.8" };
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <changefreq>weekly</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            html_escape::encode_text(&loc),
            priority
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_blocks_admin_paths_and_points_at_sitemap() {
        let robots = robots_txt("https://traveltoendfgm.org/");
        assert!(robots.contains("Disallow: /create\n"));
        assert!(robots.contains("Disallow: /edit\n"));
        assert!(robots.contains("Disallow: /api/\n"));
        assert!(robots.ends_with("Sitemap: https://traveltoendfgm.org/sitemap.xml\n"));
    }

    #[test]
    fn sitemap_lists_public_pages_under_site_url() {
        let xml = sitemap_xml("https://traveltoendfgm.org");
        assert!(xml.contains("<loc>https://traveltoendfgm.org/</loc>"));
        assert!(xml.contains("<loc>https://traveltoendfgm.org/documentaries</loc>"));
        assert!(!xml.contains("/login"));
        assert_eq!(xml.matches("<url>").count(), PUBLIC_ROUTES.len());
    }

    #[test]
    fn sitemap_escapes_the_site_url() {
        let xml = sitemap_xml("https://example.org/?a=1&b=2");
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
