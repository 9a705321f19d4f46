//! HTML views.
//!
//! Each view is a full document built around [`layout`]. Anything that did not
//! come out of the text pipeline is escaped before it is embedded.

use crate::domain::Page;
use axum::response::Html;

const STYLESHEET: &str = "/static/style.css";

/// Link target for a page's read view.
pub fn page_href(page_name: &str) -> String {
    format!("/{}", urlencoding::encode(page_name))
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, page_name: Option<&str>, body: &str) -> Html<String> {
    let edit_link = page_name
        .map(|name| {
            format!(
                r#"<a href="{}/edit">Edit this page</a>"#,
                escape_html(&page_href(name))
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
<nav><a href="/">Home</a><a href="/AllPages">AllPages</a>{edit_link}<a href="/login">Log in</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    ))
}

/// A stored page, `html_content` being the output of the text pipeline.
pub fn page_view(page_name: &str, html_content: &str) -> Html<String> {
    let body = format!(
        "<h1>{}</h1>\n<article>\n{}</article>",
        escape_html(page_name),
        html_content
    );
    layout(page_name, Some(page_name), &body)
}

/// Shown for a page name that has never been saved.
pub fn placeholder_view(page_name: &str) -> Html<String> {
    let body = format!(
        r#"<h1>{name}</h1>
<p class="placeholder">This page does not exist yet. <a href="{href}/edit">Create it</a>.</p>"#,
        name = escape_html(page_name),
        href = escape_html(&page_href(page_name)),
    );
    layout(page_name, Some(page_name), &body)
}

/// Edit form pre-filled with the raw markdown source.
pub fn edit_view(page_name: &str, current_content: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Edit {name}</h1>
<form method="post" action="{href}/save">
<textarea name="pageContent">{content}</textarea>
<button type="submit">Save</button>
</form>"#,
        name = escape_html(page_name),
        href = escape_html(&page_href(page_name)),
        content = escape_html(current_content),
    );
    layout(&format!("Edit {}", page_name), None, &body)
}

/// Every stored page, in whatever order the store returned them.
pub fn all_pages_view(pages: &[Page]) -> Html<String> {
    let items: String = pages
        .iter()
        .map(|page| {
            format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape_html(&page_href(&page.id)),
                escape_html(&page.id)
            )
        })
        .collect();

    let body = format!("<h1>AllPages</h1>\n<ul>\n{}</ul>", items);
    layout("AllPages", None, &body)
}

pub fn login_view() -> Html<String> {
    let body = r#"<h1>Log in</h1>
<form method="post" action="/login-submit">
<label>Username <input type="text" name="username"></label>
<label>Password <input type="password" name="password"></label>
<button type="submit">Log in</button>
</form>"#;
    layout("Log in", None, body)
}

pub fn error_view(message: &str) -> Html<String> {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>",
        escape_html(message)
    );
    layout("Error", None, &body)
}
