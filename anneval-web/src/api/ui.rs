//! UI serving routes
//!
//! Serves the embedded HTML pages: home, admin (upload + session
//! management), admin results dashboard, and the evaluator page.

use axum::response::{Html, IntoResponse, Response};
use axum::http::StatusCode;

const INDEX_HTML: &str = include_str!("../ui/index.html");
const ADMIN_HTML: &str = include_str!("../ui/admin.html");
const RESULTS_HTML: &str = include_str!("../ui/results.html");
const EVALUATION_HTML: &str = include_str!("../ui/evaluation.html");
const STYLE_CSS: &str = include_str!("../ui/style.css");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /admin
pub async fn serve_admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /admin/:session_id
///
/// The page reads the session id from its own URL.
pub async fn serve_results() -> Html<&'static str> {
    Html(RESULTS_HTML)
}

/// GET /evaluation/:session_id
pub async fn serve_evaluation() -> Html<&'static str> {
    Html(EVALUATION_HTML)
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], STYLE_CSS).into_response()
}
