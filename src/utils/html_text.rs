use scraper::{ElementRef, Html};

// Subtrees a reader never sees.
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Reduce an HTML document to the text a reader would see.
///
/// Markup, script/style bodies and comments are dropped; each text block is
/// trimmed and blocks are joined with a single line break. Parsing is
/// best-effort: malformed or partial markup never fails, it just yields
/// whatever text is recoverable.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut blocks: Vec<String> = Vec::new();
    collect_blocks(document.root_element(), &mut blocks);
    blocks.join("\n")
}

fn collect_blocks(element: ElementRef<'_>, blocks: &mut Vec<String>) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            collect_blocks(el, blocks);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                blocks.push(trimmed.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_keeps_visible_text() {
        let text = html_to_text("<html><body><div>Hello <b>world</b></div></body></html>");
        assert_eq!(text, "Hello\nworld");
        assert!(!text.contains('<'));
    }

    #[test]
    fn excludes_script_and_style_content() {
        let html = "<html><body><script>var x = 1;</script>\
                    <style>p { color: red }</style><p>visible</p></body></html>";
        assert_eq!(html_to_text(html), "visible");
    }

    #[test]
    fn excludes_comments_and_head() {
        let html = "<html><head><title>Page title</title></head>\
                    <body><!-- secret -->shown</body></html>";
        assert_eq!(html_to_text(html), "shown");
    }

    #[test]
    fn blocks_are_trimmed_and_newline_joined() {
        let html = "<html><body><p>  first  </p><p>\n second \n</p></body></html>";
        assert_eq!(html_to_text(html), "first\nsecond");
    }

    #[test]
    fn malformed_markup_is_best_effort() {
        assert_eq!(html_to_text("<div><p>text"), "text");
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(html_to_text("<p>a &amp; b</p>"), "a & b");
    }

    #[test]
    fn worked_example_body() {
        assert_eq!(html_to_text("<html><body>Hi</body></html>"), "Hi");
    }
}
