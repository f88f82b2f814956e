//! Public blog routes.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use nextdevs_core::BlogsData;

use super::page_response;
use crate::cache;
use crate::error::SiteError;
use crate::render;
use crate::session;
use crate::state::AppState;

/// Public post listing, served from the in-process cache when fresh.
async fn public_posts(state: &AppState) -> Result<BlogsData, SiteError> {
    cache::get_or_compute(&state.cache, cache::POSTS_KEY, || state.api.fetch_posts(None)).await
}

/// `GET /blog`
pub async fn listing(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let posts = public_posts(&state).await?;
    let notice = session::pending_notice(&headers);

    let markup = render::blog::listing(&state.config.site_name, &posts.posts, notice);

    Ok(page_response(&state, &headers, markup.into_string(), notice.is_some()))
}

/// `GET /blog/{slug}`
pub async fn post_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let posts = public_posts(&state).await?;
    let post = posts
        .find_by_slug(slug.trim())
        .filter(|p| p.is_published())
        .ok_or_else(|| SiteError::NotFound(format!("post {slug}")))?;

    let body_html = state.renderer.render(&post.content);
    if body_html.is_empty() && !post.content.trim().is_empty() {
        tracing::warn!(post_id = %post.id, slug = %post.slug, "post body rendered empty");
    }

    let notice = session::pending_notice(&headers);
    let markup = render::blog::post_page(&state.config.site_name, post, &body_html, notice);

    Ok(page_response(&state, &headers, markup.into_string(), notice.is_some()))
}
