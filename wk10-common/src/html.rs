//! HTML page shell and escaping
//!
//! Pages are assembled with `format!`; every piece of user or upstream text
//! must pass through [`escape_html`] before it is interpolated.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const PAGE_STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 860px;
            margin: 40px auto;
            padding: 0 20px;
            color: #222;
            line-height: 1.5;
        }
        h1 { color: #2a6ebb; }
        .notice { color: #b3261e; font-weight: 600; }
        .gallery img { max-width: 200px; max-height: 200px; margin: 4px; }
        textarea { width: 100%; }
        table { border-collapse: collapse; }
        td, th { padding: 4px 10px; border-bottom: 1px solid #ddd; text-align: left; }
"#;

/// Escape text for safe interpolation into HTML bodies and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap body markup in the shared document shell
///
/// `title` is escaped; `body` is trusted markup.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        escape_html(title),
        PAGE_STYLE,
        body
    ))
}

/// Generic failure page
///
/// Details stay in the logs; the client only sees the status and a fixed message.
pub fn error_page(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{} {}</h1>
<p>Something went wrong while handling your request. Please try again later.</p>
<p><a href="/">Back</a></p>"#,
        status.as_u16(),
        escape_html(reason)
    );
    (status, page("Error", &body)).into_response()
}
