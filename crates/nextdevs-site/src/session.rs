//! Cookie plumbing: the bearer-token cookie and one-shot notices.
//!
//! Notices travel as a short code in the `flash` cookie, never as free text,
//! so a crafted cookie can at most select one of the messages below.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};

/// Name of the cookie carrying a pending [`Notice`].
pub const FLASH_COOKIE: &str = "flash";

/// Lifetime of the token cookie (seven days).
const TOKEN_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Lifetime of a notice cookie.
const FLASH_MAX_AGE_SECS: u64 = 60;

/// Where a request's bearer token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer ...`
    Header,
    /// The token cookie.
    Cookie,
}

/// Bearer token of a request: the `Authorization` header first, then the
/// token cookie.
pub fn token_from_headers(
    headers: &HeaderMap,
    cookie_name: &str,
) -> Option<(String, TokenSource)> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some((token.to_string(), TokenSource::Header));
    }

    cookie_value(headers, cookie_name)
        .filter(|t| !t.is_empty())
        .map(|t| (t.to_string(), TokenSource::Cookie))
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

// =============================================================================
// Set-Cookie values
// =============================================================================

fn cookie(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut out = format!("{name}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if secure {
        out.push_str("; Secure");
    }
    out
}

/// `Set-Cookie` value storing the bearer token.
pub fn token_cookie(name: &str, token: &str, secure: bool) -> String {
    cookie(name, token, TOKEN_MAX_AGE_SECS, secure)
}

/// `Set-Cookie` value deleting cookie `name`.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    cookie(name, "", 0, secure)
}

/// `Set-Cookie` value carrying `notice` to the next page.
pub fn notice_cookie(notice: Notice, secure: bool) -> String {
    cookie(FLASH_COOKIE, notice.code(), FLASH_MAX_AGE_SECS, secure)
}

/// Append `Set-Cookie` headers to a response. Values that are not valid
/// header values are skipped.
pub fn with_cookies(mut response: Response, cookies: &[String]) -> Response {
    for value in cookies {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                response.headers_mut().append(header::SET_COOKIE, v);
            }
            Err(e) => tracing::warn!(error = %e, "dropping invalid set-cookie value"),
        }
    }
    response
}

/// `303 See Other` to `location`, setting `cookies`.
pub fn redirect_with(location: &str, cookies: &[String]) -> Response {
    with_cookies(Redirect::to(location).into_response(), cookies)
}

// =============================================================================
// Notices
// =============================================================================

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AdminRequired,
    AdminOnly,
    SessionInvalid,
    SignedIn,
    SignedOut,
    AccountCreated,
    AccountCreatedSignIn,
    PostCreated,
    PostUpdated,
    PostDeleted,
    PostDeleteFailed,
    RoleUpdated,
    RoleUpdateFailed,
}

impl Notice {
    pub const ALL: [Notice; 13] = [
        Notice::AdminRequired,
        Notice::AdminOnly,
        Notice::SessionInvalid,
        Notice::SignedIn,
        Notice::SignedOut,
        Notice::AccountCreated,
        Notice::AccountCreatedSignIn,
        Notice::PostCreated,
        Notice::PostUpdated,
        Notice::PostDeleted,
        Notice::PostDeleteFailed,
        Notice::RoleUpdated,
        Notice::RoleUpdateFailed,
    ];

    /// Cookie code.
    pub fn code(self) -> &'static str {
        match self {
            Notice::AdminRequired => "admin-required",
            Notice::AdminOnly => "admin-only",
            Notice::SessionInvalid => "session-invalid",
            Notice::SignedIn => "signed-in",
            Notice::SignedOut => "signed-out",
            Notice::AccountCreated => "account-created",
            Notice::AccountCreatedSignIn => "account-created-signin",
            Notice::PostCreated => "post-created",
            Notice::PostUpdated => "post-updated",
            Notice::PostDeleted => "post-deleted",
            Notice::PostDeleteFailed => "post-delete-failed",
            Notice::RoleUpdated => "role-updated",
            Notice::RoleUpdateFailed => "role-update-failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::AdminRequired => {
                "Admin dashboard requires authentication. Please sign in as an admin."
            }
            Notice::AdminOnly => "Only admins can open the dashboard.",
            Notice::SessionInvalid => {
                "Your session is invalid or has expired. Please sign in again."
            }
            Notice::SignedIn => "Signed in successfully.",
            Notice::SignedOut => "You have been signed out.",
            Notice::AccountCreated => "Your account has been created. Welcome!",
            Notice::AccountCreatedSignIn => "Your account has been created. Please sign in.",
            Notice::PostCreated => "Blog post created successfully!",
            Notice::PostUpdated => "Blog post updated successfully!",
            Notice::PostDeleted => "Post deleted successfully.",
            Notice::PostDeleteFailed => "The post could not be deleted.",
            Notice::RoleUpdated => "User role updated successfully.",
            Notice::RoleUpdateFailed => "The user role could not be updated.",
        }
    }

    pub fn kind(self) -> NoticeKind {
        match self {
            Notice::AdminRequired
            | Notice::AdminOnly
            | Notice::SessionInvalid
            | Notice::PostDeleteFailed
            | Notice::RoleUpdateFailed => NoticeKind::Error,
            Notice::SignedIn
            | Notice::SignedOut
            | Notice::AccountCreated
            | Notice::AccountCreatedSignIn
            | Notice::PostCreated
            | Notice::PostUpdated
            | Notice::PostDeleted
            | Notice::RoleUpdated => NoticeKind::Success,
        }
    }
}

/// Pending notice of a request, if its flash cookie names a known one.
pub fn pending_notice(headers: &HeaderMap) -> Option<Notice> {
    cookie_value(headers, FLASH_COOKIE).and_then(Notice::from_code)
}

/// Cookies a rendered page must set to consume its pending notice.
pub fn consume_notice(headers: &HeaderMap, secure: bool) -> Vec<String> {
    if cookie_value(headers, FLASH_COOKIE).is_some() {
        vec![clear_cookie(FLASH_COOKIE, secure)]
    } else {
        Vec::new()
    }
}
