//! Sign-in, sign-up and sign-out.

use axum::Form;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use nextdevs_core::Role;

use super::{CachePolicy, build_response};
use crate::api::{self, Credentials, NewAccount};
use crate::error::SiteError;
use crate::forms::{SignInForm, SignUpForm};
use crate::render;
use crate::session::{self, Notice};
use crate::state::AppState;

/// Redirect home if the request already carries a readable token.
fn already_signed_in(state: &AppState, headers: &HeaderMap) -> Option<Response> {
    let (token, _) = session::token_from_headers(headers, &state.config.token_cookie)?;
    state
        .gate
        .decode(&token)
        .is_ok()
        .then(|| session::redirect_with("/", &[]))
}

/// `GET /signin`
///
/// Visitors who already carry a readable token are sent home.
pub async fn signin_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(redirect) = already_signed_in(&state, &headers) {
        return redirect;
    }

    let notice = session::pending_notice(&headers);
    let markup = render::account::signin(&state.config.site_name, "", None, notice);
    session::with_cookies(
        build_response(StatusCode::OK, markup.into_string(), CachePolicy::Private),
        &session::consume_notice(&headers, state.config.cookie_secure),
    )
}

/// `POST /signin`
pub async fn signin(State(state): State<AppState>, Form(form): Form<SignInForm>) -> Response {
    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        return form_error(
            &state,
            &email,
            StatusCode::BAD_REQUEST,
            "Please enter both email and password.",
        );
    }

    let credentials = Credentials {
        email,
        password: form.password,
    };

    match state.api.sign_in(&credentials).await {
        Ok(signed_in) => {
            tracing::info!(email = %credentials.email, "sign in succeeded");
            let secure = state.config.cookie_secure;
            session::redirect_with(
                "/admin",
                &[
                    session::token_cookie(&state.config.token_cookie, &signed_in.token, secure),
                    session::notice_cookie(Notice::SignedIn, secure),
                ],
            )
        }
        Err(SiteError::Backend { status, message }) if status.is_client_error() => {
            tracing::info!(email = %credentials.email, status = %status, "sign in rejected");
            form_error(&state, &credentials.email, StatusCode::UNAUTHORIZED, &message)
        }
        Err(e) => {
            tracing::error!(error = %e, "sign in failed");
            form_error(
                &state,
                &credentials.email,
                StatusCode::BAD_GATEWAY,
                "An unexpected error occurred. Please try again later.",
            )
        }
    }
}

fn form_error(state: &AppState, email: &str, status: StatusCode, message: &str) -> Response {
    let markup = render::account::signin(&state.config.site_name, email, Some(message), None);
    build_response(status, markup.into_string(), CachePolicy::Private)
}

/// `GET /signup`
pub async fn signup_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(redirect) = already_signed_in(&state, &headers) {
        return redirect;
    }

    let notice = session::pending_notice(&headers);
    let markup =
        render::account::signup(&state.config.site_name, &SignUpForm::default(), None, notice);
    session::with_cookies(
        build_response(StatusCode::OK, markup.into_string(), CachePolicy::Private),
        &session::consume_notice(&headers, state.config.cookie_secure),
    )
}

/// `POST /signup`
///
/// New accounts always get the `USER` role. When the backend starts a session
/// the token is stored like a sign-in; otherwise the visitor is sent to the
/// sign-in page.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Response {
    if let Err(message) = form.validate() {
        return signup_error(&state, &form, StatusCode::BAD_REQUEST, message);
    }

    let name = form.name.trim().to_string();
    let avatar = match form.avatar.trim() {
        "" => api::default_avatar_url(&name),
        url => url.to_string(),
    };
    let account = NewAccount {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        role: Role::User,
        avatar,
        bio: form.bio.trim().to_string(),
        name,
    };

    let secure = state.config.cookie_secure;
    match state.api.sign_up(&account).await {
        Ok(Some(signed_up)) => session::redirect_with(
            "/",
            &[
                session::token_cookie(&state.config.token_cookie, &signed_up.token, secure),
                session::notice_cookie(Notice::AccountCreated, secure),
            ],
        ),
        Ok(None) => session::redirect_with(
            "/signin",
            &[session::notice_cookie(Notice::AccountCreatedSignIn, secure)],
        ),
        Err(SiteError::Backend { status, message }) if status.is_client_error() => {
            tracing::info!(email = %account.email, status = %status, "sign up rejected");
            signup_error(&state, &form, status, &message)
        }
        Err(e) => {
            tracing::error!(error = %e, "sign up failed");
            signup_error(
                &state,
                &form,
                StatusCode::BAD_GATEWAY,
                "An unexpected error occurred. Please try again later.",
            )
        }
    }
}

fn signup_error(state: &AppState, form: &SignUpForm, status: StatusCode, message: &str) -> Response {
    let markup = render::account::signup(&state.config.site_name, form, Some(message), None);
    build_response(status, markup.into_string(), CachePolicy::Private)
}

/// `POST /signout`
pub async fn signout(State(state): State<AppState>) -> Response {
    let secure = state.config.cookie_secure;
    session::redirect_with(
        "/",
        &[
            session::clear_cookie(&state.config.token_cookie, secure),
            session::notice_cookie(Notice::SignedOut, secure),
        ],
    )
}
