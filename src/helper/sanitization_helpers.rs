use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};
use std::collections::HashSet;

const ALLOWED_TAGS: [&str; 27] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "b", "strong", "i", "em", "p", "br", "a", "ul", "ol", "li",
    "blockquote", "code", "pre", "hr", "img", "table", "thead", "tbody", "tr", "th", "td",
];

/// Renders an article body written in Markdown to HTML that is safe to embed.
/// Raw HTML in the source survives only if it is on the allow list; scripts
/// and event handler attributes never do.
pub fn render_markdown(markdown_input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown_input, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);

    let mut tags: HashSet<&str> = ALLOWED_TAGS.iter().copied().collect();
    tags.insert("del");

    Builder::new()
        .tags(tags)
        .generic_attributes(["src", "href", "alt", "title"].into_iter().collect())
        .link_rel(Some("nofollow noopener"))
        .clean(&unsafe_html)
        .to_string()
}

/// Strips all HTML tags from input (for titles and summaries).
pub fn strip_all_html(input: &str) -> String {
    Builder::new().tags(HashSet::new()).clean(input).to_string()
}

/// Plain-text preview of a Markdown body, cut on a character boundary.
pub fn excerpt(markdown_input: &str, max_chars: usize) -> String {
    let text = strip_all_html(&render_markdown(markdown_input));
    let text = html_escape::decode_html_entities(&text);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
