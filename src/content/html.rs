//! HTML to plain text extraction
//!
//! Uses the scraper crate to walk the DOM, dropping page chrome (navigation,
//! headers, footers, ads) and non-visible content, then collapses whitespace
//! into single spaces.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose whole subtree is discarded
const SKIPPED_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "svg",
    "nav",
    "header",
    "footer",
    "aside",
    "advertisement",
    "ads",
    "sidebar",
    "menu",
    "widget",
    "banner",
];

/// Elements that end a run of text; a separator is emitted after them
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "title", "tr", "ul",
];

/// Extract readable text from an HTML document.
///
/// ```
/// use webintel::content::extract_text;
///
/// let text = extract_text("<html><body><nav>Menu</nav><p>Hello</p><p>World</p></body></html>");
/// assert_eq!(text, "Hello World");
/// ```
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut raw);
    collapse_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }

    if BLOCK_ELEMENTS.contains(&name) {
        out.push(' ');
    }
}

/// Replace every whitespace run with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_unwanted_elements() {
        let html = r#"
            <html>
              <head><style>body { color: red; }</style><script>var x = 1;</script></head>
              <body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <article><h1>Title</h1><p>Body text.</p></article>
                <aside>Related links</aside>
                <footer>Copyright</footer>
              </body>
            </html>
        "#;

        let text = extract_text(html);
        assert_eq!(text, "Title Body text.");
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<p>  lots\n\n of \t  space  </p><p>next</p>";
        assert_eq!(extract_text(html), "lots of space next");
    }

    #[test]
    fn test_inline_elements_do_not_split_words() {
        let html = "<p>un<b>bold</b>ed and <a href='#'>linked</a>.</p>";
        assert_eq!(extract_text(html), "unbolded and linked.");
    }

    #[test]
    fn test_decodes_entities_and_skips_comments() {
        let html = "<p>Fish &amp; Chips<!-- hidden --></p>";
        assert_eq!(extract_text(html), "Fish & Chips");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_text(""), "");
        assert_eq!(collapse_whitespace("   \n\t "), "");
    }
}
