use pulldown_cmark::{CowStr, Event, Options as CmarkOptions, Parser, Tag, TagEnd, html};
use regex::Regex;
use std::sync::LazyLock;

// two or more capitalised runs, e.g. HomePage or WikiWord2, but not HTML or Page
static CAMEL_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z0-9]+){2,}\b").expect("CamelCase pattern is valid")
});

// the full text pipeline applied to stored page content before it is rendered
pub fn render_page_content(markdown_content: &str) -> String {
    compile_markdown_to_html(markdown_content, |word| {
        format!("/{}", urlencoding::encode(word))
    })
}

// compiles markdown into HTML, turning CamelCase words in plain text into links
// whose href comes from the provided resolver
pub fn compile_markdown_to_html<F>(markdown_content: &str, mut resolver: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown_content, options);

    // text inside links (markdown or inline html), images, code blocks or raw html blocks is left alone
    let mut link_depth = 0usize;
    let mut in_code_block = false;
    let mut in_html_block = false;

    // the parser can split one run of text into several events, so linkable
    // text is buffered until something else shows up
    let mut pending_text = String::new();
    let mut events: Vec<Event> = Vec::new();

    for event in parser {
        let linkable = link_depth == 0 && !in_code_block && !in_html_block;

        if let Event::Text(text) = &event {
            if linkable {
                pending_text.push_str(text);
                continue;
            }
        }

        flush_text(&mut pending_text, &mut resolver, &mut events);

        match &event {
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::HtmlBlock) => in_html_block = true,
            Event::End(TagEnd::HtmlBlock) => in_html_block = false,
            // raw anchors written inline, e.g. <a href="..">HomePage</a>
            Event::InlineHtml(raw) => {
                if opens_anchor(raw) {
                    link_depth += 1;
                } else if closes_anchor(raw) {
                    link_depth = link_depth.saturating_sub(1);
                }
            }
            _ => {}
        }

        events.push(event);
    }
    flush_text(&mut pending_text, &mut resolver, &mut events);

    let mut html_content = String::new();
    html::push_html(&mut html_content, events.into_iter());

    html_content
}

// splits buffered text around CamelCase words, emitting each word as an inline anchor
fn flush_text<F>(pending_text: &mut String, resolver: &mut F, out: &mut Vec<Event<'_>>)
where
    F: FnMut(&str) -> String,
{
    if pending_text.is_empty() {
        return;
    }

    let text = std::mem::take(pending_text);
    let mut last = 0;

    for found in CAMEL_CASE.find_iter(&text) {
        if found.start() > last {
            out.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
        }

        let word = found.as_str();
        let href = resolver(word);
        // the pattern only admits [A-Za-z0-9], so the word itself needs no escaping
        out.push(Event::InlineHtml(CowStr::from(format!(
            r#"<a href="{}">{}</a>"#,
            escape_attr(&href),
            word
        ))));
        last = found.end();
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

fn opens_anchor(raw: &str) -> bool {
    let tag = raw.trim_start().to_ascii_lowercase();
    tag.starts_with("<a ") || tag.starts_with("<a>") || tag.starts_with("<a\t") || tag.starts_with("<a\n")
}

fn closes_anchor(raw: &str) -> bool {
    raw.trim_start().to_ascii_lowercase().starts_with("</a")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
