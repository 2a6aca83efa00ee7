//! Static file serving.
//!
//! `GET /*` resolves against the configured root; `/` serves `index.html`.
//! Content types come from the file extension. Anything missing, and any
//! non-GET request no route claimed, gets the JSON 404.

use axum::{handler::HandlerWithoutStateExt, Router};
use tower_http::services::ServeDir;

use crate::config::schema::StaticFilesConfig;
use crate::http::handlers::not_found;

/// Router whose fallback serves files from `config.root`.
pub fn router<S>(config: &StaticFilesConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let serve_dir = ServeDir::new(&config.root)
        .append_index_html_on_directories(true)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new().fallback_service(serve_dir)
}
