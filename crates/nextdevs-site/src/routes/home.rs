//! Home page: the landing page pointing at the blog.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use maud::html;

use super::page_response;
use crate::render::components::{Nav, page_shell};
use crate::session;
use crate::state::AppState;

const STEPS: [(&str, &str); 3] = [
    (
        "Create your profile",
        "Tell partners about your newsletter, your niche and your audience.",
    ),
    (
        "Find partners",
        "Browse creators with complementary audiences and propose a swap.",
    ),
    (
        "Grow together",
        "Run cross-promotions and watch both subscriber lists grow.",
    ),
];

/// Render the home page.
pub async fn home_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let notice = session::pending_notice(&headers);

    let body = html! {
        section class="hero" {
            h1 { "Grow Your Newsletter Together" }
            p {
                "Connect with fellow newsletter creators, share audiences, and grow your "
                "subscriber base through proven cross-promotion strategies."
            }
            a class="button" href="/blog" { "Read the blog" }
        }
        section {
            h2 { "Start Growing in 3 Easy Steps" }
            div class="stats" {
                @for (i, (title, text)) in STEPS.iter().enumerate() {
                    div class="stat" {
                        div class="stat-value" { (i + 1) }
                        strong { (title) }
                        p class="post-excerpt" { (text) }
                    }
                }
            }
        }
    };

    let markup = page_shell(&state.config.site_name, "Home", Nav::Public, notice, body);
    page_response(&state, &headers, markup.into_string(), notice.is_some())
}
