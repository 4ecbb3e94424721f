use pulldown_cmark::{html, Event, Options, Parser};

/// Render markdown to HTML.
///
/// Raw HTML events are re-emitted as text, so markup produced by the
/// markdown syntax itself passes through while literal HTML in server
/// content renders escaped.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render message content either as markdown or as escaped plain text.
/// Placeholders and user input always take the plain path.
pub fn render_message_content(content: &str, use_markdown: bool) -> String {
    if use_markdown {
        render_markdown(content)
    } else {
        escape_html(content).replace('\n', "<br>")
    }
}

/// Escape HTML metacharacters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bold() {
        let html = render_markdown("**yo**");
        assert!(html.contains("<strong>yo</strong>"));
    }

    #[test]
    fn renders_headings_and_code() {
        let html = render_markdown("# Hello\n\n```\nlet x = 1;\n```");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<pre><code>"));
    }

    #[test]
    fn raw_html_is_neutralized() {
        let html = render_markdown("before <script>alert(1)</script> after");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn raw_block_html_is_neutralized() {
        let html = render_markdown("<div onclick=\"x()\">hi</div>");
        assert!(!html.contains("<div"));
    }

    #[test]
    fn plain_mode_escapes_and_breaks() {
        let html = render_message_content("a <b> &\nc", false);
        assert_eq!(html, "a &lt;b&gt; &amp;<br>c");
    }

    #[test]
    fn escape_html_covers_quotes() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
    }
}
