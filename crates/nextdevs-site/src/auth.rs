//! Admin gate middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use nextdevs_core::{AccessDecision, ClaimSet, DenyReason, PageGate};

use crate::session::{self, Notice, TokenSource};
use crate::state::AppState;

/// Authenticated admin, inserted into request extensions by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Raw bearer token, forwarded to the backend on every admin call.
    pub token: String,
    /// Claims the gate admitted.
    pub claims: ClaimSet,
}

/// Middleware guarding every `/admin` route.
///
/// The token is read from `Authorization: Bearer <token>` or, failing that,
/// the token cookie. Unauthorized requests never reach the handler: they get a
/// `303` to the gate's redirect target plus a notice, and a malformed token
/// cookie is deleted.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let found = session::token_from_headers(request.headers(), &state.config.token_cookie);
    let decision = state.gate.check(found.as_ref().map(|(token, _)| token.as_str()));

    let mut page = PageGate::new();
    page.resolve(&decision);

    if page.permits_render()
        && let (AccessDecision::Authorized(claims), Some((token, _))) = (decision, found.clone())
    {
        tracing::debug!(user = %claims.display_name(), "admin access granted");
        request.extensions_mut().insert(AdminSession { token, claims });
        return next.run(request).await;
    }

    let Some(redirect) = page.take_redirect() else {
        return session::redirect_with("/signin", &[]);
    };

    let secure = state.config.cookie_secure;
    let notice = match redirect.reason {
        DenyReason::MissingToken => Notice::AdminRequired,
        DenyReason::MalformedToken => Notice::SessionInvalid,
        DenyReason::InsufficientRole => Notice::AdminOnly,
    };

    let mut cookies = vec![session::notice_cookie(notice, secure)];
    if redirect.reason == DenyReason::MalformedToken
        && matches!(found, Some((_, TokenSource::Cookie)))
    {
        cookies.push(session::clear_cookie(&state.config.token_cookie, secure));
    }

    tracing::info!(
        path = %request.uri().path(),
        reason = ?redirect.reason,
        location = redirect.location,
        "admin access denied"
    );

    session::redirect_with(redirect.location, &cookies)
}
