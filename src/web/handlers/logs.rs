//! # Log View Handler
//!
//! Serves the orchestrator's own log file as preformatted HTML, mirroring
//! what operators get from the mission services themselves.

use axum::extract::State;
use axum::response::Html;
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// View orchestrator logs: GET /logs
pub async fn view_logs(State(state): State<Arc<AppState>>) -> Html<String> {
    let path = state.config.logging.own_logfile();
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Html(format!("<pre>{}</pre>", escape(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Html("<pre>No logs yet</pre>".to_string())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error reading log file");
            Html(format!("<pre>Error reading logs: {e}</pre>"))
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }
}
