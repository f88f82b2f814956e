//! Error types for the site.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since every route serves HTML to a browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

/// Site error type.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The requested post or page does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request could not be understood (bad form or query input).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The remote API answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend { status: StatusCode, message: String },

    /// The remote API could not be reached or sent an unreadable body.
    #[error("upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SiteError {
    /// Status code the error page is served with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Backend { status, .. } if status.is_client_error() => *status,
            Self::Backend { .. } | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message suitable for showing inline on an admin page.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Backend { message, .. } => message.clone(),
            Self::Upstream(_) => "The blog service is unreachable right now.".to_string(),
            Self::Internal(_) => "An internal error occurred.".to_string(),
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match &self {
            Self::NotFound(msg) => (
                "Not Found",
                format!("The page you were looking for does not exist: {msg}"),
            ),
            Self::BadRequest(msg) => ("Bad Request", msg.clone()),
            Self::Backend { status, message } => {
                tracing::error!(status = %status, message = %message, "backend error");
                ("Request Failed", message.clone())
            }
            Self::Upstream(err) => {
                tracing::error!(error = %err, "upstream request failed");
                (
                    "Service Unavailable",
                    "The blog service is temporarily unavailable. Please try again later."
                        .to_string(),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) " | Pick & Partner" }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to home" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = SiteError::NotFound("post missing-slug".to_string());
        assert_eq!(err.to_string(), "not found: post missing-slug");
    }

    #[test]
    fn error_display_backend() {
        let err = SiteError::Backend {
            status: StatusCode::FORBIDDEN,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 403 Forbidden: Forbidden");
    }

    #[test]
    fn error_display_internal() {
        let err = SiteError::Internal(anyhow::anyhow!("something broke"));
        assert_eq!(err.to_string(), "internal error: something broke");
    }

    #[test]
    fn error_into_response_not_found() {
        let response = SiteError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_into_response_bad_request() {
        let response = SiteError::BadRequest("bad page".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_client_errors_pass_through() {
        let err = SiteError::Backend {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn backend_server_errors_become_bad_gateway() {
        let err = SiteError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "db down".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_into_response_internal() {
        let response = SiteError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn user_message_hides_internal_detail() {
        let err = SiteError::Internal(anyhow::anyhow!("secret stack detail"));
        assert!(!err.user_message().contains("secret"));
    }
}
