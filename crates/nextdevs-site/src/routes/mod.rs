//! Route definitions for the site.
//!
//! ## Routes
//!
//! - `GET /` - Landing page
//! - `GET /health` - Health check (JSON)
//! - `GET /blog` - Post listing
//! - `GET /blog/{slug}` - Single post
//! - `GET|POST /signin` - Sign-in form
//! - `GET|POST /signup` - Account creation form
//! - `POST /signout` - Clear the session
//! - `GET /admin` - Dashboard overview (admin only)
//! - `GET /admin/blogs` - Post management (admin only)
//! - `GET|POST /admin/blogs/new` - Create a post (admin only)
//! - `GET|POST /admin/blogs/{id}/edit` - Edit a post (admin only)
//! - `POST /admin/blogs/{id}/delete` - Delete a post (admin only)
//! - `GET /admin/users` - User management (admin only)
//! - `POST /admin/users/{id}/role` - Change a user's role (admin only)

mod account;
mod admin;
mod blog;
mod health;
mod home;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use crate::auth::require_admin;
use crate::render;
use crate::session;
use crate::state::AppState;

/// Build the complete site router.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/", get(admin::overview))
        .route("/blogs", get(admin::blogs))
        .route("/blogs/new", get(admin::new_post).post(admin::create_post))
        .route("/blogs/{id}/edit", get(admin::edit_post).post(admin::update_post))
        .route("/blogs/{id}/delete", post(admin::delete_blog))
        .route("/users", get(admin::users))
        .route("/users/{id}/role", post(admin::update_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/blog", get(blog::listing))
        .route("/blog/{slug}", get(blog::post_page))
        .route("/signin", get(account::signin_page).post(account::signin))
        .route("/signup", get(account::signup_page).post(account::signup))
        .route("/signout", post(account::signout))
        .nest("/admin", admin)
        .with_state(state)
}

/// Caching policy of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CachePolicy {
    /// Same for every visitor; CDN-cacheable.
    Public,
    /// Per-visitor (admin pages, pages showing a notice).
    Private,
}

impl CachePolicy {
    fn header_value(self) -> &'static str {
        match self {
            CachePolicy::Public => "public, max-age=60, s-maxage=60, stale-while-revalidate=300",
            CachePolicy::Private => "private, no-store",
        }
    }
}

/// Build an HTML response with security and cache headers.
pub(crate) fn build_response(status: StatusCode, html: String, policy: CachePolicy) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(policy.header_value()),
    );

    // ETag (xxHash of content), public pages only
    if policy == CachePolicy::Public {
        let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
        let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
        if let Ok(val) = HeaderValue::from_str(&etag) {
            headers.insert(header::ETAG, val);
        }
    }

    (status, headers, html).into_response()
}

/// `200 OK` page response that consumes any pending notice. Pages showing a
/// notice are personal and never publicly cacheable.
pub(crate) fn page_response(
    state: &AppState,
    headers: &HeaderMap,
    html: String,
    personal: bool,
) -> Response {
    let policy = if personal {
        CachePolicy::Private
    } else {
        CachePolicy::Public
    };
    session::with_cookies(
        build_response(StatusCode::OK, html, policy),
        &session::consume_notice(headers, state.config.cookie_secure),
    )
}
