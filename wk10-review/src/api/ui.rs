//! HTML pages for wk10-review

use axum::response::Html;
use wk10_common::html::{escape_html, page};

use crate::classifier::ClassificationResult;
use crate::form::{ReviewSubmission, MIN_REVIEW_LENGTH};

/// Review form, pre-filled with `text` and an optional validation notice
pub fn review_form(text: &str, notice: Option<&str>) -> Html<String> {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Movie Review Classifier</h1>
<p>Write a review of at least {} characters and find out how it reads.</p>
{}
<form action="/results" method="post">
    <label for="moviereview">Your review</label>
    <textarea id="moviereview" name="moviereview" rows="8" cols="60">{}</textarea>
    <input type="submit" value="Submit review">
</form>"#,
        MIN_REVIEW_LENGTH,
        notice_html,
        escape_html(text)
    );

    page("Movie Review Classifier", &body)
}

/// Classification outcome for one review
pub fn results_page(submission: &ReviewSubmission, result: &ClassificationResult) -> Html<String> {
    let body = format!(
        r#"<h1>Your review</h1>
<blockquote>{}</blockquote>
<p>Prediction: <strong>{}</strong></p>
<p>Probability: {:.2}%</p>
<p><a href="/">Submit another review</a></p>"#,
        escape_html(&submission.text),
        escape_html(&result.label),
        result.probability * 100.0
    );

    page("Review Results", &body)
}
