//! Markdown rendering with HTML sanitization

use std::collections::HashSet;

use pulldown_cmark::{html, Options, Parser};

/// Link relation added to every anchor that survives sanitization
const LINK_REL: &str = "nofollow noopener noreferrer";

/// URL schemes allowed in `href` and `src`
const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Renders untrusted markdown bodies into display-safe HTML
///
/// Every call parses and sanitizes from scratch; nothing is cached.
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    options: Options,
}

impl ContentRenderer {
    /// Create a renderer with the common extensions enabled
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Render markdown to sanitized HTML
    ///
    /// Malformed markdown never fails; it comes out as literal text.
    pub fn render(&self, markdown: &str) -> String {
        let expanded = self.expand(markdown);
        sanitize(&expanded)
    }

    fn expand(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run HTML through the user-generated-content allow-list
fn sanitize(html: &str) -> String {
    let schemes: HashSet<&str> = URL_SCHEMES.iter().copied().collect();
    ammonia::Builder::default()
        .url_schemes(schemes)
        .link_rel(Some(LINK_REL))
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        ContentRenderer::new().render(markdown)
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_script_removed_heading_kept() {
        let html = render("<script>alert(1)</script>\n# Title");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_inline_script_removed() {
        let html = render("hello <script>alert(1)</script> world");
        assert!(!html.contains("<script"));
        assert!(html.contains("hello"));
        assert!(html.contains("world"));
    }

    #[test]
    fn test_event_handlers_stripped() {
        let html = render(r#"<img src="https://example.com/a.png" onerror="alert(1)">"#);
        assert!(html.contains("https://example.com/a.png"));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_javascript_links_stripped() {
        let html = render("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
    }

    #[test]
    fn test_iframe_stripped() {
        let html = render(r#"<iframe src="https://evil.example"></iframe>"#);
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_links_get_rel() {
        let html = render("[home](https://example.com)");
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"rel="nofollow noopener noreferrer""#));
    }

    #[test]
    fn test_lists_and_code() {
        let html = render("- one\n- two\n\nuse `x < y`");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<code>x &lt; y</code>"));
    }

    #[test]
    fn test_unclosed_markup_degrades_to_text() {
        let html = render("**not closed and [broken](");
        assert!(html.contains("**not closed"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let body = "# A\n\n*b* and [c](https://c.example)";
        assert_eq!(render(body), render(body));
    }

    #[test]
    fn test_empty() {
        assert!(render("").is_empty());
    }
}
