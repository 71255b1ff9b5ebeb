//! HTML pages for wk10-search

use axum::response::Html;
use wk10_common::html::{escape_html, page};

use crate::services::AnnotationResult;
use crate::storage::StoredAsset;
use crate::validators::ALLOWED_EXTENSIONS;
use crate::UPLOAD_URL_PREFIX;

/// Upload form, optionally with a notice explaining why it is shown again
pub fn upload_form(notice: Option<&str>) -> Html<String> {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Image Search</h1>
<p>Upload a picture to find out what it shows and where similar images live on the web.</p>
{}
<form action="/search" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept="image/*">
    <input type="submit" value="Search">
</form>
<p><small>Allowed file types: {}</small></p>"#,
        notice_html,
        ALLOWED_EXTENSIONS.join(", ")
    );

    page("Image Search", &body)
}

/// Results page for one annotated upload
pub fn search_results(asset: &StoredAsset, result: &AnnotationResult) -> Html<String> {
    let original_url = format!("{}/{}", UPLOAD_URL_PREFIX, asset.file_name);

    let best_guess = match &result.best_guess_label {
        Some(label) => format!("<p>Best guess: <strong>{}</strong></p>", escape_html(label)),
        None => "<p>No best guess for this image.</p>".to_string(),
    };

    let entities = if result.web_entities.is_empty() {
        "<p>No web entities found.</p>".to_string()
    } else {
        let rows: String = result
            .web_entities
            .iter()
            .map(|entity| {
                format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape_html(entity.description.as_deref().unwrap_or("-")),
                    entity
                        .score
                        .map(|s| format!("{:.3}", s))
                        .unwrap_or_else(|| "-".to_string())
                )
            })
            .collect();
        format!(
            "<table>\n<tr><th>Entity</th><th>Score</th></tr>\n{}</table>",
            rows
        )
    };

    let links: Vec<String> = result
        .similar_image_urls
        .iter()
        .filter(|url| is_web_url(url))
        .map(|url| {
            let url = escape_html(url);
            format!(r#"<a href="{0}"><img src="{0}" alt="similar image"></a>"#, url)
        })
        .collect();
    let similar = if links.is_empty() {
        "<p>No visually similar images found.</p>".to_string()
    } else {
        format!(r#"<div class="gallery">{}</div>"#, links.join("\n"))
    };

    let body = format!(
        r#"<h1>Search Results</h1>
<div class="gallery"><img src="{}" alt="uploaded image"></div>
{}
<h2>Web Entities</h2>
{}
<h2>Visually Similar Images</h2>
{}
<p><a href="/">Search another image</a></p>"#,
        escape_html(&original_url),
        best_guess,
        entities,
        similar
    );

    page("Search Results", &body)
}

/// Only `http`/`https` URLs are rendered as links or images
fn is_web_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::WebEntity;
    use std::path::PathBuf;

    fn asset() -> StoredAsset {
        StoredAsset {
            path: PathBuf::from("/srv/uploads/cat.png"),
            file_name: "cat.png".to_string(),
        }
    }

    #[test]
    fn test_upload_form_lists_extensions() {
        let Html(doc) = upload_form(None);
        assert!(doc.contains(r#"name="file""#));
        assert!(doc.contains("png, jpg, jpeg, gif, bmp"));
        assert!(!doc.contains("class=\"notice\""));
    }

    #[test]
    fn test_upload_form_escapes_notice() {
        let Html(doc) = upload_form(Some("<bad>.exe is not allowed"));
        assert!(doc.contains("&lt;bad&gt;.exe is not allowed"));
    }

    #[test]
    fn test_results_show_everything() {
        let result = AnnotationResult {
            best_guess_label: Some("cat,feline".to_string()),
            web_entities: vec![WebEntity {
                entity_id: Some("/m/01yrx".to_string()),
                score: Some(0.98765),
                description: Some("Cat".to_string()),
            }],
            similar_image_urls: vec!["https://img.example/a.jpg?x=1&y=2".to_string()],
        };

        let Html(doc) = search_results(&asset(), &result);
        assert!(doc.contains(r#"src="/static/tmp/cat.png""#));
        assert!(doc.contains("<strong>cat,feline</strong>"));
        assert!(doc.contains("<td>Cat</td><td>0.988</td>"));
        assert!(doc.contains("https://img.example/a.jpg?x=1&amp;y=2"));
    }

    #[test]
    fn test_results_empty_sections() {
        let Html(doc) = search_results(&asset(), &AnnotationResult::default());
        assert!(doc.contains("No best guess"));
        assert!(doc.contains("No web entities found."));
        assert!(doc.contains("No visually similar images found."));
    }

    #[test]
    fn test_results_escape_labels() {
        let result = AnnotationResult {
            best_guess_label: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let Html(doc) = search_results(&asset(), &result);
        assert!(!doc.contains("<script>alert(1)</script>"));
        assert!(doc.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_results_drop_non_web_urls() {
        let result = AnnotationResult {
            similar_image_urls: vec![
                "javascript:alert(document.cookie)".to_string(),
                "JavaScript:alert(1)".to_string(),
                "data:image/png;base64,AAAA".to_string(),
                "not a url".to_string(),
                "http://img.example/ok.jpg".to_string(),
            ],
            ..Default::default()
        };
        let Html(doc) = search_results(&asset(), &result);
        assert!(!doc.to_lowercase().contains("javascript:"));
        assert!(!doc.contains("data:image"));
        assert!(!doc.contains("not a url"));
        assert!(doc.contains(r#"href="http://img.example/ok.jpg""#));
    }

    #[test]
    fn test_only_unsafe_urls_reads_as_none_found() {
        let result = AnnotationResult {
            similar_image_urls: vec!["javascript:alert(1)".to_string()],
            ..Default::default()
        };
        let Html(doc) = search_results(&asset(), &result);
        assert!(doc.contains("No visually similar images found."));
    }
}
