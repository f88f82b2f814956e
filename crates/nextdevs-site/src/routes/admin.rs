//! Admin console routes. Every handler here runs behind
//! [`require_admin`](crate::auth::require_admin).

use axum::extract::{Extension, Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use nextdevs_core::search::{self, MAX_RECOMMENDATIONS};
use nextdevs_core::{DashboardStats, Role};
use serde::Deserialize;

use super::{CachePolicy, build_response};
use crate::api::USERS_PAGE_SIZE;
use crate::auth::AdminSession;
use crate::cache;
use crate::error::SiteError;
use crate::forms::PostForm;
use crate::render;
use crate::render::admin::EditorTarget;
use crate::session::{self, Notice};
use crate::state::AppState;

fn admin_page(state: &AppState, headers: &HeaderMap, html: String) -> Response {
    session::with_cookies(
        build_response(StatusCode::OK, html, CachePolicy::Private),
        &session::consume_notice(headers, state.config.cookie_secure),
    )
}

/// `GET /admin`
///
/// Posts and users are fetched concurrently. A failure of either is listed
/// on the page instead of failing the whole request.
pub async fn overview(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    headers: HeaderMap,
) -> Response {
    let (posts, users) = tokio::join!(
        state.api.fetch_posts(Some(&admin.token)),
        state.api.fetch_users(&admin.token, 1, 1),
    );

    let mut errors = Vec::new();
    let users = match users {
        Ok(users) => Some(users),
        Err(e) => {
            tracing::warn!(error = %e, "dashboard user stats unavailable");
            errors.push(e.user_message());
            None
        }
    };
    let stats = match posts {
        Ok(posts) => Some(DashboardStats::compute(
            &posts,
            users.as_ref().map(|u| &u.pagination),
        )),
        Err(e) => {
            tracing::warn!(error = %e, "dashboard post stats unavailable");
            errors.insert(0, e.user_message());
            None
        }
    };

    let markup = render::admin::overview(
        &state.config.site_name,
        &admin.claims.display_name(),
        stats.as_ref(),
        &errors,
        session::pending_notice(&headers),
    );
    admin_page(&state, &headers, markup.into_string())
}

/// Query string of `GET /admin/blogs`.
#[derive(Debug, Default, Deserialize)]
pub struct BlogsQuery {
    #[serde(default)]
    q: String,
}

/// `GET /admin/blogs?q=`
pub async fn blogs(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Query(query): Query<BlogsQuery>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let data = state.api.fetch_posts(Some(&admin.token)).await?;

    let matches = search::filter_posts(&data.posts, &query.q);
    let suggestions = search::recommendations(&data.posts, &query.q, MAX_RECOMMENDATIONS);
    tracing::debug!(term = %query.q, matches = matches.len(), "admin post search");

    let markup = render::admin::blogs(
        &state.config.site_name,
        &matches,
        query.q.trim(),
        &suggestions,
        session::pending_notice(&headers),
    );
    Ok(admin_page(&state, &headers, markup.into_string()))
}

fn editor_page(
    state: &AppState,
    target: EditorTarget<'_>,
    form: &PostForm,
    preview: Option<&str>,
    error: Option<(StatusCode, &str)>,
) -> Response {
    let (status, message) = match error {
        Some((status, message)) => (status, Some(message)),
        None => (StatusCode::OK, None),
    };
    let markup = render::admin::post_editor(
        &state.config.site_name,
        target,
        form,
        preview,
        message,
        None,
    );
    build_response(status, markup.into_string(), CachePolicy::Private)
}

/// Validate and save an editor submission, or re-render it with a preview
/// or the reason it was refused.
async fn submit_post(
    state: &AppState,
    admin: &AdminSession,
    target: EditorTarget<'_>,
    form: PostForm,
) -> Response {
    if form.is_preview() {
        let preview = state.renderer.render(&form.content);
        return editor_page(state, target, &form, Some(&preview), None);
    }

    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => {
            return editor_page(
                state,
                target,
                &form,
                None,
                Some((StatusCode::BAD_REQUEST, message.as_str())),
            );
        }
    };

    let (result, notice) = match target {
        EditorTarget::New => (
            state.api.create_post(&admin.token, &input).await,
            Notice::PostCreated,
        ),
        EditorTarget::Existing(id) => (
            state.api.update_post(&admin.token, id, &input).await,
            Notice::PostUpdated,
        ),
    };

    match result {
        Ok(()) => {
            cache::invalidate(&state.cache, cache::POSTS_KEY).await;
            session::redirect_with(
                "/admin/blogs",
                &[session::notice_cookie(notice, state.config.cookie_secure)],
            )
        }
        Err(e) => {
            tracing::warn!(post = ?target, error = %e, "post save failed");
            let message = e.user_message();
            editor_page(state, target, &form, None, Some((e.status(), message.as_str())))
        }
    }
}

/// `GET /admin/blogs/new`
pub async fn new_post(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let markup = render::admin::post_editor(
        &state.config.site_name,
        EditorTarget::New,
        &PostForm::default(),
        None,
        None,
        session::pending_notice(&headers),
    );
    admin_page(&state, &headers, markup.into_string())
}

/// `POST /admin/blogs/new`
pub async fn create_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Form(form): Form<PostForm>,
) -> Response {
    submit_post(&state, &admin, EditorTarget::New, form).await
}

/// `GET /admin/blogs/{id}/edit`
///
/// The form is prefilled from the admin post listing, with the current body
/// rendered below it.
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let data = state.api.fetch_posts(Some(&admin.token)).await?;
    let post = data
        .posts
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SiteError::NotFound(format!("post {id}")))?;

    let preview = state.renderer.render(&post.content);
    let markup = render::admin::post_editor(
        &state.config.site_name,
        EditorTarget::Existing(&post.id),
        &PostForm::from_post(post),
        Some(&preview),
        None,
        session::pending_notice(&headers),
    );
    Ok(admin_page(&state, &headers, markup.into_string()))
}

/// `POST /admin/blogs/{id}/edit`
pub async fn update_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> Response {
    submit_post(&state, &admin, EditorTarget::Existing(&id), form).await
}

/// `POST /admin/blogs/{id}/delete`
pub async fn delete_blog(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Response {
    let notice = match state.api.delete_post(&admin.token, &id).await {
        Ok(()) => {
            cache::invalidate(&state.cache, cache::POSTS_KEY).await;
            Notice::PostDeleted
        }
        Err(e) => {
            tracing::warn!(post_id = %id, error = %e, "post deletion failed");
            Notice::PostDeleteFailed
        }
    };

    session::redirect_with(
        "/admin/blogs",
        &[session::notice_cookie(notice, state.config.cookie_secure)],
    )
}

/// Query string of `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    page: Option<u32>,
}

/// `GET /admin/users?page=`
pub async fn users(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Query(query): Query<UsersQuery>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let page = query.page.unwrap_or(1).max(1);
    let data = state
        .api
        .fetch_users(&admin.token, page, USERS_PAGE_SIZE)
        .await?;

    let markup = render::admin::users(
        &state.config.site_name,
        &data,
        page,
        session::pending_notice(&headers),
    );
    Ok(admin_page(&state, &headers, markup.into_string()))
}

/// Body of `POST /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    role: String,
    page: Option<u32>,
}

/// `POST /admin/users/{id}/role`
pub async fn update_role(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<String>,
    Form(form): Form<RoleForm>,
) -> Result<Response, SiteError> {
    let role: Role = form.role.parse().map_err(SiteError::BadRequest)?;
    let page = form.page.unwrap_or(1).max(1);

    let notice = match state.api.update_user_role(&admin.token, &id, role).await {
        Ok(()) => Notice::RoleUpdated,
        Err(e) => {
            tracing::warn!(user_id = %id, role = %role, error = %e, "role update failed");
            Notice::RoleUpdateFailed
        }
    };

    Ok(session::redirect_with(
        &format!("/admin/users?page={page}"),
        &[session::notice_cookie(notice, state.config.cookie_secure)],
    ))
}
