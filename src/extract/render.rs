//! Fragment rendering
//!
//! A slot's raw fragment is the concatenation of its matched blocks, each
//! kept as `<pre>` plus the block's inner markup from the page. Rendering
//! reparses that markup, reads each block's text and wraps it in
//! language-tagged code markup, so no markup from the page survives.

use dom_query::{Document, Selection};

/// Top-level blocks of a raw or rendered fragment
const BLOCK_SELECTOR: &str = "body > pre";

/// Raw form of one matched block
pub fn raw_block(inner: &str) -> String {
    format!("<pre>{}</pre>", inner)
}

/// Text of a parsed block, with line breaks kept as newlines
fn block_text(doc: &Document, block: &Selection) -> String {
    let breaks = block.select("br");
    for br in breaks.nodes() {
        br.replace_with(&doc.tree.new_text("\n"));
    }
    block.text().to_string()
}

/// Decoded text of every top-level block in a fragment
fn fragment_blocks(fragment: &str) -> Vec<String> {
    let doc = Document::from(fragment);
    doc.select(BLOCK_SELECTOR)
        .nodes()
        .iter()
        .map(|node| block_text(&doc, &Selection::from(*node)))
        .collect()
}

/// Sanitize a block's inner markup for display.
///
/// The markup is parsed, its text content taken (`<br>` becomes a newline,
/// comments and attributes are dropped, entities are decoded) and escaped.
pub fn sanitize(markup: &str) -> String {
    escape_html(&fragment_blocks(&raw_block(markup)).concat())
}

/// Wrap a block's inner markup for the requesting language
pub fn wrap_block(markup: &str, language: &str) -> String {
    render_fragment(&raw_block(markup), language)
}

/// Render a raw slot fragment as one code element per block
pub fn render_fragment(raw: &str, language: &str) -> String {
    let class = escape_html(language);
    fragment_blocks(raw)
        .iter()
        .map(|text| {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                class,
                escape_html(text)
            )
        })
        .collect()
}

/// Plain code text of a raw or rendered fragment, blocks separated by a blank line
pub fn fragment_text(fragment: &str) -> String {
    fragment_blocks(fragment).join("\n\n")
}

/// Lay out two rendered fragments as a two-column row
pub fn side_by_side(first: &str, second: &str) -> String {
    format!(
        "<div class=\"row\">\n  <div class=\"half\">\n    {}\n  </div>\n  <div class=\"half\">\n    {}\n  </div>\n</div>\n",
        first, second
    )
}

/// Escape text for inclusion in markup
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_block_tags_language() {
        let html = wrap_block("fmt.Println(1)", "go");
        assert_eq!(
            html,
            "<pre><code class=\"language-go\">fmt.Println(1)</code></pre>"
        );
    }

    #[test]
    fn test_sanitize_strips_injected_markup() {
        let out = sanitize("<img src=x onerror=alert(1)><span class=\"kw\">if</span> a &lt; b");
        assert!(!out.contains("<img"));
        assert!(!out.contains("<span"));
        assert_eq!(out, "if a &lt; b");
    }

    #[test]
    fn test_sanitize_ignores_quoted_attributes_and_comments() {
        let markup = r#"<span title="a>b<img src=x onerror=alert(1)>">code</span>x<!-- hidden > leaked -->y"#;
        assert_eq!(sanitize(markup), "codexy");

        let wrapped = wrap_block(markup, "go");
        assert!(!wrapped.contains("leaked"));
        assert!(!wrapped.contains("onerror"));
        assert_eq!(wrapped, "<pre><code class=\"language-go\">codexy</code></pre>");
    }

    #[test]
    fn test_sanitize_decodes_and_reescapes() {
        assert_eq!(sanitize("x &amp;&amp; y"), "x &amp;&amp; y");
        assert_eq!(sanitize("&#39;a&#x27;"), "&#39;a&#39;");
        assert_eq!(sanitize("a<br/>b"), "a\nb");
        assert_eq!(sanitize("fish & chips"), "fish &amp; chips");
    }

    #[test]
    fn test_sanitize_keeps_whitespace() {
        assert_eq!(sanitize("  indented\n\tline"), "  indented\n\tline");
    }

    #[test]
    fn test_render_fragment_wraps_each_block() {
        let raw = format!("{}{}", raw_block("a &lt; b"), raw_block("<b>c</b>"));
        assert_eq!(
            render_fragment(&raw, "rust"),
            "<pre><code class=\"language-rust\">a &lt; b</code></pre>\
             <pre><code class=\"language-rust\">c</code></pre>"
        );
        assert_eq!(render_fragment("", "rust"), "");
    }

    #[test]
    fn test_fragment_text_decodes_raw_and_rendered() {
        let raw = format!("{}{}", raw_block("if a &lt; b {"), raw_block("x<br>y"));
        assert_eq!(fragment_text(&raw), "if a < b {\n\nx\ny");
        assert_eq!(fragment_text(&render_fragment(&raw, "go")), "if a < b {\n\nx\ny");
    }

    #[test]
    fn test_side_by_side_layout() {
        let html = side_by_side("<pre>a</pre>", "<pre>b</pre>");
        assert!(html.starts_with("<div class=\"row\">"));
        let a = html.find("<pre>a</pre>").unwrap();
        let b = html.find("<pre>b</pre>").unwrap();
        assert!(a < b);
        assert_eq!(html.matches("class=\"half\"").count(), 2);
    }
}
