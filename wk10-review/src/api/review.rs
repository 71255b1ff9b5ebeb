//! Review form and classification handlers

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::{debug, info};

use super::ui;
use crate::form::{self, ReviewForm};
use crate::AppState;

/// GET /
pub async fn index() -> Html<String> {
    ui::review_form("", None)
}

/// POST /results
///
/// Invalid input re-renders the form with the submitted text and the first
/// failed rule; the classifier only sees validated text.
pub async fn results(
    State(state): State<AppState>,
    form: Result<Form<ReviewForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            info!(reason = %rejection.body_text(), "Review form rejected");
            return (rejection.status(), ui::review_form("", Some(&rejection.body_text())))
                .into_response();
        }
    };

    let submission = match form::validate(&form.moviereview) {
        Ok(submission) => submission,
        Err(e) => {
            info!(reason = %e, "Review rejected");
            return ui::review_form(&form.moviereview, Some(&e.to_string())).into_response();
        }
    };

    let result = state.classifier.classify(&submission.text);
    info!(
        label = %result.label,
        probability = result.probability,
        chars = submission.text.chars().count(),
        "Review classified"
    );
    debug!(text = %submission.text, "Classified review text");

    ui::results_page(&submission, &result).into_response()
}
